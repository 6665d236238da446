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

#![warn(missing_docs)]

//! Wumpus World.
//!
//! The cave from Chapter 7 (Logical Agents): a grid with pits, one wumpus and gold. The agent only
//! ever sees five percepts (stench, breeze, glitter, bump, scream) and must find the gold and
//! climb back out of the start cell without walking into a pit or the live wumpus.
//!
//! The pieces, leaves first:
//!
//! - [`GridWorld`] holds the cells and the wumpus and computes position-derived percepts.
//! - [`ActionResolver`] applies the rules to one action and produces a [`Transition`].
//! - [`WumpusEnvironment`] is a world plus the agent's pose, score and step count.
//! - [`EpisodeController`] runs an [`Agent`] in the environment and appends each step to a
//!   [`TelemetryLog`].
//!
//! All randomness comes from seeded generators, so an episode is reproducible from its seed.

pub mod action;
pub mod agent;
pub mod config;
pub mod environment;
pub mod episode;
pub mod error;
pub mod percept;
pub mod resolver;
pub mod telemetry;
pub mod world;

pub use action::Action;
pub use agent::RandomAgent;
pub use config::{RewardConfig, Score, WorldConfig};
pub use environment::WumpusEnvironment;
pub use episode::{EpisodeController, EpisodeHandle};
pub use error::WumpusError;
pub use percept::{Events, PerceptBundle};
pub use resolver::{ActionResolver, Outcome, Transition};
pub use telemetry::{StepRecord, TelemetryLog};
pub use world::{
    AgentState, Cell, GridWorld, GridWorldBuilder, Orientation, Position, Wumpus, WumpusState,
};

/// Random number generator used for world generation and by agents.
pub type Rng = rand_pcg::Pcg64;

/// An Agent acts in a Performance, Environment, Action, Sensing (PEAS) cycle.
/// For a given Percept, the Agent will return an Action.
///
/// Notice that the Agent is not aware of an Environment, its only interface is the Percept coming
/// in then the Action going out. An agent that wants a map of the cave has to build one itself from
/// the percepts it has seen.
pub trait Agent {
    /// What the agent can do.
    type Action;

    /// What the agent can sense.
    type Percept;

    /// Pick the next action.
    fn choose_action(&mut self, percept: &Self::Percept) -> Self::Action;

    /// Forget everything and reseed, ready for a new episode. Agents without state or randomness
    /// can ignore this.
    fn reset(&mut self, _seed: u64) {}
}

/// An Environment runs a single Agent in a Performance, Environment, Action, Sensing (PEAS) cycle.
///
/// Notice that the Environment is not aware of an Agent.
pub trait Environment {
    /// What an agent can do here.
    type Action;

    /// What an agent senses here.
    type Percept;

    /// Performance measure.
    type Score: num_traits::NumAssign + Copy;

    /// Why an action could not be executed.
    type Error;

    /// The percept for the agent's current situation.
    fn percept(&self) -> Self::Percept;

    /// Execute one action and return the reward it earned.
    fn execute_action(&mut self, action: &Self::Action) -> Result<Self::Score, Self::Error>;

    /// Whether the episode is over.
    fn is_terminal(&self) -> bool;

    /// Returns the cumulative score of the episode so far.
    fn score(&self) -> Self::Score;
}
