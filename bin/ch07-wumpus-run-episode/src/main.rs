/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wumpus_world::{
    Action, EpisodeController, RandomAgent, RewardConfig, StepRecord, WorldConfig, WumpusError,
};

// Chapter 7 Logical Agents, the Wumpus World (section 7.2).
//
// Runs one episode and prints the board after every step. The baseline random agent plays unless
// --manual is given, in which case actions are read from stdin one per line, e.g. "forward",
// "left", "right", "grab", "shoot", "climb".

/// Contents of the --config file. Missing fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunConfig {
    world: WorldConfig,
    rewards: RewardConfig,
}

/// Run one Wumpus World episode and print the board after every step.
#[derive(Debug, PartialEq, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed; a fresh one is drawn when omitted
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Grid side length, overriding the config file
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(2..))]
    size: Option<u64>,

    /// JSON file with `world` and `rewards` sections
    #[arg(long, value_name = "FILE.json")]
    config: Option<PathBuf>,

    /// Write every step record to this file as JSON lines
    #[arg(long, value_name = "FILE.jsonl")]
    log: Option<PathBuf>,

    /// Read actions from stdin instead of playing the random agent
    #[arg(long)]
    manual: bool,
}

fn print_step(record: &StepRecord, episode: &EpisodeController<RandomAgent>) {
    println!(
        "step {}: {} -> reward {}, score {}, percepts {}",
        record.step, record.action, record.reward, record.score, record.percepts_after
    );
    println!("{}", episode.environment());
}

fn write_log(path: &Path, episode: &EpisodeController<RandomAgent>) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for record in episode.export_log() {
        serde_json::to_writer(&mut out, record)?;
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut run = match &args.config {
        Some(path) => serde_json::from_str::<RunConfig>(&std::fs::read_to_string(path)?)?,
        None => RunConfig::default(),
    };
    if let Some(size) = args.size {
        let size = usize::try_from(size)?;
        run.world.width = size;
        run.world.height = size;
    }

    let mut episode =
        EpisodeController::with_agent(args.seed, run.world, run.rewards, RandomAgent::default())?;
    info!(seed = episode.seed(), manual = args.manual, "running episode");
    println!("{}", episode.environment());

    if args.manual {
        let stdin = std::io::stdin();
        let mut lines = stdin.lock().lines();
        while !episode.is_terminal() {
            println!("percepts: {}", episode.last_percepts());
            let Some(line) = lines.next() else {
                warn!("stdin closed before the episode ended");
                break;
            };
            let action = match line?.parse::<Action>() {
                Ok(action) => action,
                Err(e @ WumpusError::InvalidAction(_)) => {
                    println!("{}", e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let record = episode.step_with(action)?;
            print_step(&record, &episode);
        }
    } else {
        while !episode.is_terminal() {
            let record = episode.step()?;
            print_step(&record, &episode);
        }
    }

    match episode.outcome() {
        Some(outcome) => println!(
            "{} after {} steps, score {}",
            outcome,
            episode.steps(),
            episode.score()
        ),
        None => println!(
            "stopped after {} steps, score {}",
            episode.steps(),
            episode.score()
        ),
    }

    if let Some(path) = &args.log {
        write_log(path, &episode)?;
        info!(path = %path.display(), records = episode.log().len(), "wrote step log");
    }
    Ok(())
}
