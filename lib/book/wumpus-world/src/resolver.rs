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

//! Action resolution: given a world, an agent pose and a requested action, compute the next state,
//! the one-shot events and the reward. Resolution is pure; the caller applies the [`Transition`].

use serde::{Deserialize, Serialize};

use crate::{Action, AgentState, Events, GridWorld, Orientation, Position, RewardConfig, Score};

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Walked into a pit or a live wumpus.
    Died,

    /// Climbed out of the exit holding the gold.
    ClimbedWithGold,

    /// Climbed out of the exit empty-handed.
    ClimbedWithoutGold,

    /// Ran out of steps.
    Timeout,
}

impl Outcome {
    /// Whether the agent got out with the gold.
    pub fn is_success(self) -> bool {
        self == Outcome::ClimbedWithGold
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Outcome::Died => "died",
            Outcome::ClimbedWithGold => "climbed out with gold",
            Outcome::ClimbedWithoutGold => "climbed out without gold",
            Outcome::Timeout => "timed out",
        };
        write!(f, "{}", s)
    }
}

/// An accepted transition. Nothing changes until [`Transition::apply`] is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Agent state after the action.
    pub agent: AgentState,

    /// The arrow killed the wumpus.
    pub wumpus_killed: bool,

    /// Gold was picked up from this cell.
    pub gold_taken: Option<Position>,

    /// Bump and scream for the resulting percepts.
    pub events: Events,

    /// Reward for this action alone.
    pub reward: Score,

    /// Set when the action ended the episode.
    pub outcome: Option<Outcome>,
}

impl Transition {
    /// Write the transition into the world and the agent state.
    pub fn apply(&self, world: &mut GridWorld, agent: &mut AgentState) {
        if self.wumpus_killed {
            world.kill_wumpus();
        }
        if let Some(position) = self.gold_taken {
            world.remove_gold(position);
        }
        *agent = self.agent;
    }
}

/// Applies the rules of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionResolver {
    rewards: RewardConfig,
    allow_climb_without_gold: bool,
}

impl ActionResolver {
    /// Create a resolver.
    pub fn new(rewards: RewardConfig, allow_climb_without_gold: bool) -> Self {
        Self {
            rewards,
            allow_climb_without_gold,
        }
    }

    /// Reward configuration in use.
    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }

    /// Resolve `action` taken by `agent` in `world`.
    ///
    /// Rewards: every action costs `step_cost`, except dying (`death_penalty` only) and climbing
    /// out (`gold_bonus` or `climb_without_gold_reward` only). Releasing the arrow adds
    /// `shoot_cost`, picking up gold adds `grab_bonus`.
    pub fn resolve(&self, world: &GridWorld, agent: &AgentState, action: Action) -> Transition {
        let mut transition = Transition {
            agent: *agent,
            wumpus_killed: false,
            gold_taken: None,
            events: Events::default(),
            reward: self.rewards.step_cost,
            outcome: None,
        };
        let next = &mut transition.agent;

        match action {
            Action::TurnLeft => next.orientation = next.orientation.turn_left(),
            Action::TurnRight => next.orientation = next.orientation.turn_right(),
            Action::MoveForward => {
                let target = world
                    .forward(next.position, next.orientation)
                    .filter(|&p| !world.is_wall(p));
                match target {
                    None => transition.events.bump = true,
                    Some(target) => {
                        next.position = target;
                        if world.is_pit(target) || world.is_wumpus_alive(target) {
                            next.alive = false;
                            transition.reward = self.rewards.death_penalty;
                            transition.outcome = Some(Outcome::Died);
                        }
                    }
                }
            }
            Action::Grab => {
                if world.has_gold(next.position) {
                    next.has_gold = true;
                    transition.gold_taken = Some(next.position);
                    transition.reward = transition.reward.saturating_add(self.rewards.grab_bonus);
                }
            }
            Action::Shoot => {
                if next.has_arrow {
                    next.has_arrow = false;
                    transition.reward = transition.reward.saturating_add(self.rewards.shoot_cost);
                    if arrow_hits_wumpus(world, next.position, next.orientation) {
                        transition.wumpus_killed = true;
                        transition.events.scream = true;
                    }
                }
            }
            Action::Climb => {
                if next.position == Position::START {
                    if next.has_gold {
                        transition.reward = self.rewards.gold_bonus;
                        transition.outcome = Some(Outcome::ClimbedWithGold);
                    } else if self.allow_climb_without_gold {
                        transition.reward = self.rewards.climb_without_gold_reward;
                        transition.outcome = Some(Outcome::ClimbedWithoutGold);
                    }
                }
            }
        }

        transition
    }
}

/// Fly the arrow from `from` until it leaves the grid, hits a wall or hits a live wumpus.
fn arrow_hits_wumpus(world: &GridWorld, from: Position, orientation: Orientation) -> bool {
    let mut position = from;
    while let Some(next) = world.forward(position, orientation) {
        if world.is_wall(next) {
            return false;
        }
        if world.is_wumpus_alive(next) {
            return true;
        }
        position = next;
    }
    false
}
