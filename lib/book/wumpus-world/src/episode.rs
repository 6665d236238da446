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

//! Episode control: the step loop, drive modes and reset.

use rand::{Rng as _, SeedableRng};
use tracing::info;

use crate::{
    Action, ActionResolver, Agent, Environment, GridWorld, Outcome, PerceptBundle, RandomAgent,
    RewardConfig, Rng, Score, StepRecord, TelemetryLog, WorldConfig, WumpusEnvironment,
    WumpusError, WumpusState,
};

/// The usual handle: an episode driven by the baseline agent.
pub type EpisodeHandle = EpisodeController<RandomAgent>;

/// Where the world comes from on every (re)start.
#[derive(Debug, Clone)]
enum WorldSource {
    Random(WorldConfig),
    Fixed {
        world: GridWorld,
        allow_climb_without_gold: bool,
    },
}

/// Drives one agent through one episode at a time and records every step.
///
/// The controller exclusively owns the world, the agent and the log. Callers drive it with
/// [`EpisodeController::step`] (one step), [`EpisodeController::play`] (to the end) or
/// [`EpisodeController::play_for`] (a bounded number of steps), and may
/// [`EpisodeController::pause`] between calls. Stopping is just not calling it again.
#[derive(Debug, Clone)]
pub struct EpisodeController<A> {
    seed: u64,
    source: WorldSource,
    rewards: RewardConfig,
    environment: WumpusEnvironment,
    agent: A,
    log: TelemetryLog,
    paused: bool,
}

impl EpisodeController<RandomAgent> {
    /// Start an episode on a random `grid_size` x `grid_size` world with the baseline agent.
    ///
    /// Without a seed one is drawn from OS entropy; [`EpisodeController::seed`] reports it either
    /// way.
    pub fn new_episode(
        seed: Option<u64>,
        grid_size: usize,
        config: RewardConfig,
    ) -> Result<Self, WumpusError> {
        Self::with_agent(
            seed,
            WorldConfig::square(grid_size),
            config,
            RandomAgent::default(),
        )
    }
}

impl<A> EpisodeController<A>
where
    A: Agent<Action = Action, Percept = PerceptBundle>,
{
    /// Start an episode on a random world with any agent. The agent is reset with a seed derived
    /// from the world seed.
    pub fn with_agent(
        seed: Option<u64>,
        world_config: WorldConfig,
        rewards: RewardConfig,
        agent: A,
    ) -> Result<Self, WumpusError> {
        let seed = seed.unwrap_or_else(fresh_seed);
        Self::start(seed, WorldSource::Random(world_config), rewards, agent)
    }

    /// Start an episode on a hand-built world. Resetting restores this same world; the seed passed
    /// to reset only reseeds the agent.
    pub fn with_world(
        world: GridWorld,
        allow_climb_without_gold: bool,
        rewards: RewardConfig,
        agent: A,
    ) -> Result<Self, WumpusError> {
        let source = WorldSource::Fixed {
            world,
            allow_climb_without_gold,
        };
        Self::start(0, source, rewards, agent)
    }

    fn start(
        seed: u64,
        source: WorldSource,
        rewards: RewardConfig,
        mut agent: A,
    ) -> Result<Self, WumpusError> {
        let environment = build_environment(seed, &source, rewards)?;
        agent.reset(agent_seed(seed));
        info!(
            seed,
            width = environment.world().width(),
            height = environment.world().height(),
            max_steps = rewards.max_steps,
            "episode started"
        );
        Ok(Self {
            seed,
            source,
            rewards,
            environment,
            agent,
            log: TelemetryLog::new(),
            paused: false,
        })
    }

    /// Advance exactly one step: percepts to the agent, its action through the rules, the record
    /// into the log.
    pub fn step(&mut self) -> Result<StepRecord, WumpusError> {
        self.ensure_running()?;
        let percepts_before = self.environment.percept();
        let action = self.agent.choose_action(&percepts_before);
        self.advance(percepts_before, action)
    }

    /// Advance one step with an action chosen by the caller instead of the agent.
    pub fn step_with(&mut self, action: Action) -> Result<StepRecord, WumpusError> {
        self.ensure_running()?;
        let percepts_before = self.environment.percept();
        self.advance(percepts_before, action)
    }

    /// Step until the episode ends. Returns `None` without stepping while paused.
    pub fn play(&mut self) -> Result<Option<Outcome>, WumpusError> {
        self.ensure_running()?;
        while !self.paused {
            if let Some(outcome) = self.step()?.outcome {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    /// Step until the episode ends, at most `max` times. Returns the number of steps taken, zero
    /// while paused.
    pub fn play_for(&mut self, max: usize) -> Result<usize, WumpusError> {
        self.ensure_running()?;
        let mut taken = 0;
        while taken < max && !self.paused && !self.is_terminal() {
            self.step()?;
            taken += 1;
        }
        Ok(taken)
    }

    /// Hold off [`EpisodeController::play`] and [`EpisodeController::play_for`]. Explicit single
    /// steps still work.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Undo [`EpisodeController::pause`].
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether the episode is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Throw the episode away and start a new one with the same configuration. A random world is
    /// regenerated from `seed` (or a fresh one); a hand-built world is restored as it was.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<(), WumpusError> {
        let seed = seed.unwrap_or_else(fresh_seed);
        self.environment = build_environment(seed, &self.source, self.rewards)?;
        self.agent.reset(agent_seed(seed));
        self.seed = seed;
        self.log = TelemetryLog::new();
        self.paused = false;
        info!(seed, "episode reset");
        Ok(())
    }

    /// Every step so far, in order. Calling again starts from the first step.
    pub fn export_log(&self) -> std::slice::Iter<'_, StepRecord> {
        self.log.iter()
    }

    /// The telemetry log.
    pub fn log(&self) -> &TelemetryLog {
        &self.log
    }

    /// World seed of the current episode.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// World and agent state, for display.
    pub fn environment(&self) -> &WumpusEnvironment {
        &self.environment
    }

    /// The agent.
    pub fn agent(&self) -> &A {
        &self.agent
    }

    /// Reward configuration in use.
    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    /// Cumulative score.
    pub fn score(&self) -> Score {
        self.environment.score()
    }

    /// Steps taken.
    pub fn steps(&self) -> u32 {
        self.environment.steps()
    }

    /// How the episode ended, if it has.
    pub fn outcome(&self) -> Option<Outcome> {
        self.environment.outcome()
    }

    /// Whether no more steps can be taken.
    pub fn is_terminal(&self) -> bool {
        self.environment.is_terminal()
    }

    /// What the agent would see if asked to act now.
    pub fn last_percepts(&self) -> PerceptBundle {
        self.environment.percept()
    }

    fn ensure_running(&self) -> Result<(), WumpusError> {
        if self.is_terminal() {
            return Err(WumpusError::EpisodeAlreadyTerminal {
                steps: self.steps(),
            });
        }
        Ok(())
    }

    fn advance(
        &mut self,
        percepts_before: PerceptBundle,
        action: Action,
    ) -> Result<StepRecord, WumpusError> {
        let reward = self.environment.execute_action(&action)?;
        if !self.environment.is_terminal() && self.environment.steps() >= self.rewards.max_steps {
            self.environment.time_out();
        }

        let agent = self.environment.agent();
        let wumpus_alive = self
            .environment
            .world()
            .wumpus()
            .map_or(false, |w| w.state == WumpusState::Alive);
        let record = StepRecord {
            step: self.environment.steps(),
            action,
            reward,
            score: self.environment.score(),
            percepts_before,
            percepts_after: self.environment.percept(),
            position: agent.position,
            orientation: agent.orientation,
            has_gold: agent.has_gold,
            has_arrow: agent.has_arrow,
            wumpus_alive,
            alive: agent.alive,
            terminal: self.environment.is_terminal(),
            outcome: self.environment.outcome(),
        };
        self.log.append(record);

        if let Some(outcome) = record.outcome {
            info!(
                seed = self.seed,
                steps = record.step,
                score = record.score,
                %outcome,
                "episode ended"
            );
        }
        Ok(record)
    }
}

fn build_environment(
    seed: u64,
    source: &WorldSource,
    rewards: RewardConfig,
) -> Result<WumpusEnvironment, WumpusError> {
    match source {
        WorldSource::Random(config) => {
            let mut rng = Rng::seed_from_u64(seed);
            WumpusEnvironment::generate(config, rewards, &mut rng)
        }
        WorldSource::Fixed {
            world,
            allow_climb_without_gold,
        } => {
            rewards.validate()?;
            let resolver = ActionResolver::new(rewards, *allow_climb_without_gold);
            Ok(WumpusEnvironment::new(world.clone(), resolver))
        }
    }
}

/// The agent draws from its own stream, offset from the world's.
fn agent_seed(seed: u64) -> u64 {
    seed.wrapping_add(1)
}

fn fresh_seed() -> u64 {
    Rng::from_entropy().gen()
}
