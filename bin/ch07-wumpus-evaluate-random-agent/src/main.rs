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

//! Chapter 7, Wumpus World, evaluate the random agent.

// Run the baseline random agent in many randomly generated caves and report how it does: the
// average score and how often each way of ending an episode happens.

use clap::Parser;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wumpus_world::{EpisodeController, Outcome, RewardConfig, Score, WumpusError};

const OUTCOMES: [Outcome; 4] = [
    Outcome::ClimbedWithGold,
    Outcome::ClimbedWithoutGold,
    Outcome::Died,
    Outcome::Timeout,
];

#[derive(Debug, Default)]
struct Summary {
    episodes: usize,
    total_score: Score,
    outcomes: FxHashMap<Outcome, usize>,
}

/// Evaluate the baseline random agent over a range of seeded worlds.
#[derive(Debug, PartialEq, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of episodes to play
    #[arg(long, value_name = "N", default_value_t = 1000)]
    episodes: u64,

    /// Grid side length
    #[arg(
        long,
        value_name = "N",
        default_value_t = 4,
        value_parser = clap::value_parser!(u64).range(2..)
    )]
    size: u64,

    /// Seed of the first episode; episode i uses FIRST_SEED + i
    #[arg(long, value_name = "SEED", default_value_t = 0)]
    first_seed: u64,
}

impl Summary {
    fn add(mut self, outcome: Outcome, score: Score) -> Self {
        self.episodes += 1;
        self.total_score = self.total_score.saturating_add(score);
        *self.outcomes.entry(outcome).or_default() += 1;
        self
    }

    fn merge(mut self, other: Summary) -> Self {
        self.episodes += other.episodes;
        self.total_score = self.total_score.saturating_add(other.total_score);
        for (outcome, count) in other.outcomes {
            *self.outcomes.entry(outcome).or_default() += count;
        }
        self
    }

    fn average_score(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_score as f64 / self.episodes as f64
        }
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }
}

fn run_one(seed: u64, size: usize, rewards: RewardConfig) -> Result<(Outcome, Score), WumpusError> {
    let mut episode = EpisodeController::new_episode(Some(seed), size, rewards)?;
    // the random agent always plays until the step budget at the latest
    let outcome = episode.play()?.unwrap_or(Outcome::Timeout);
    Ok((outcome, episode.score()))
}

fn evaluate(
    episodes: u64,
    size: usize,
    first_seed: u64,
    rewards: RewardConfig,
) -> Result<Summary, WumpusError> {
    if episodes == 0 {
        return Ok(Summary::default());
    }
    let last_seed = first_seed.checked_add(episodes - 1).ok_or_else(|| {
        WumpusError::OutOfBoundsConfig(format!(
            "{} episodes starting at seed {} run past the last seed",
            episodes, first_seed
        ))
    })?;
    let results: Vec<(Outcome, Score)> = (first_seed..=last_seed)
        .into_par_iter()
        .map(|seed| run_one(seed, size, rewards))
        .collect::<Result<_, _>>()?;
    Ok(results
        .into_iter()
        .map(|(outcome, score)| Summary::default().add(outcome, score))
        .fold(Summary::default(), Summary::merge))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,wumpus_world=warn")),
        )
        .init();

    let Args {
        episodes,
        size,
        first_seed,
    } = Args::parse();
    let size = usize::try_from(size)?;

    info!(episodes, size, first_seed, "evaluating random agent");
    let summary = evaluate(episodes, size, first_seed, RewardConfig::default())?;

    println!("episodes: {}", summary.episodes);
    println!("average score: {:.2}", summary.average_score());
    for outcome in OUTCOMES {
        let count = summary.count(outcome);
        println!(
            "{}: {} ({:.1}%)",
            outcome,
            count,
            100.0 * count as f64 / summary.episodes.max(1) as f64
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_episode_is_counted_once() {
        let summary = evaluate(40, 4, 0, RewardConfig::default()).unwrap();
        assert_eq!(summary.episodes, 40);
        let counted: usize = OUTCOMES.iter().map(|&o| summary.count(o)).sum();
        assert_eq!(counted, 40);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let a = evaluate(20, 5, 100, RewardConfig::default()).unwrap();
        let b = evaluate(20, 5, 100, RewardConfig::default()).unwrap();
        assert_eq!(a.total_score, b.total_score);
        for outcome in OUTCOMES {
            assert_eq!(a.count(outcome), b.count(outcome));
        }
    }

    #[test]
    fn test_bad_grid_size_is_reported() {
        assert!(matches!(
            evaluate(3, 1, 0, RewardConfig::default()),
            Err(WumpusError::OutOfBoundsConfig(_))
        ));
    }

    #[test]
    fn test_seed_range_reaching_the_last_seed() {
        let summary = evaluate(2, 4, u64::MAX - 1, RewardConfig::default()).unwrap();
        assert_eq!(summary.episodes, 2);
        assert!(matches!(
            evaluate(2, 4, u64::MAX, RewardConfig::default()),
            Err(WumpusError::OutOfBoundsConfig(_))
        ));
        assert_eq!(
            evaluate(0, 4, u64::MAX, RewardConfig::default())
                .unwrap()
                .episodes,
            0
        );
    }

    #[test]
    fn test_parse_flags_and_defaults() {
        let args = Args::try_parse_from(["wumpus-evaluate-random-agent"]).unwrap();
        assert_eq!(
            args,
            Args {
                episodes: 1000,
                size: 4,
                first_seed: 0,
            }
        );

        let args = Args::try_parse_from([
            "wumpus-evaluate-random-agent",
            "--episodes=50",
            "--size",
            "6",
            "--first-seed",
            "9",
        ])
        .unwrap();
        assert_eq!(
            args,
            Args {
                episodes: 50,
                size: 6,
                first_seed: 9,
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Args::try_parse_from(["wumpus-evaluate-random-agent", "--size", "1"]).is_err());
        assert!(Args::try_parse_from(["wumpus-evaluate-random-agent", "--episodes", "-3"]).is_err());
        assert!(Args::try_parse_from(["wumpus-evaluate-random-agent", "100"]).is_err());
        let err = Args::try_parse_from(["wumpus-evaluate-random-agent", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_average_of_nothing_is_zero() {
        assert_eq!(Summary::default().average_score(), 0.0);
    }
}
