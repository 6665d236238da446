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

//! One episode's world state behind the [`Environment`](crate::Environment) trait.

use tracing::debug;

use crate::{
    Action, ActionResolver, AgentState, Environment, Events, GridWorld, Outcome, PerceptBundle,
    Position, RewardConfig, Rng, Score, Transition, WorldConfig, WumpusError, WumpusState,
};

/// The full state of one episode's world: grid, agent pose, score and step count. Only the
/// [`PerceptBundle`] from [`Environment::percept`] is meant for agents; everything else is for the
/// controller and for debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WumpusEnvironment {
    world: GridWorld,
    agent: AgentState,
    resolver: ActionResolver,
    last_events: Events,
    score: Score,
    steps: u32,
    outcome: Option<Outcome>,
}

impl WumpusEnvironment {
    /// Put a fresh agent at the start of `world`.
    pub fn new(world: GridWorld, resolver: ActionResolver) -> Self {
        Self {
            world,
            agent: AgentState::default(),
            resolver,
            last_events: Events::default(),
            score: 0,
            steps: 0,
            outcome: None,
        }
    }

    /// Generate a random world and put a fresh agent at its start.
    pub fn generate(
        config: &WorldConfig,
        rewards: RewardConfig,
        rng: &mut Rng,
    ) -> Result<Self, WumpusError> {
        rewards.validate()?;
        let world = GridWorld::generate(config, rng)?;
        let resolver = ActionResolver::new(rewards, config.allow_climb_without_gold);
        Ok(Self::new(world, resolver))
    }

    /// The grid.
    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    /// The agent's pose and inventory.
    pub fn agent(&self) -> &AgentState {
        &self.agent
    }

    /// The rules in force.
    pub fn resolver(&self) -> &ActionResolver {
        &self.resolver
    }

    /// Actions taken so far.
    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// How the episode ended, if it has.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Resolve and apply one action.
    pub fn execute(&mut self, action: Action) -> Result<Transition, WumpusError> {
        if self.outcome.is_some() {
            return Err(WumpusError::EpisodeAlreadyTerminal { steps: self.steps });
        }
        let transition = self.resolver.resolve(&self.world, &self.agent, action);
        transition.apply(&mut self.world, &mut self.agent);
        self.last_events = transition.events;
        self.score = self.score.saturating_add(transition.reward);
        self.steps += 1;
        self.outcome = transition.outcome;
        debug!(
            step = self.steps,
            %action,
            reward = transition.reward,
            score = self.score,
            position = %self.agent.position,
            orientation = %self.agent.orientation,
            "executed action"
        );
        Ok(transition)
    }

    /// End a still-running episode because the step budget is spent.
    pub(crate) fn time_out(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(Outcome::Timeout);
        }
    }
}

impl Environment for WumpusEnvironment {
    type Action = Action;
    type Percept = PerceptBundle;
    type Score = Score;
    type Error = WumpusError;

    fn percept(&self) -> Self::Percept {
        self.world
            .percepts_at(self.agent.position)
            .with_events(self.last_events)
    }

    fn execute_action(&mut self, action: &Self::Action) -> Result<Self::Score, Self::Error> {
        self.execute(*action).map(|t| t.reward)
    }

    fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    fn score(&self) -> Self::Score {
        self.score
    }
}

// debug board, top row first. A agent, # wall, P pit, W/w live/dead wumpus, G gold.
impl std::fmt::Display for WumpusEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let wumpus = self.world.wumpus();
        for row in (0..self.world.height()).rev() {
            for col in 0..self.world.width() {
                let position = Position::new(row, col);
                let c = if position == self.agent.position {
                    'A'
                } else if self.world.is_wall(position) {
                    '#'
                } else if self.world.is_pit(position) {
                    'P'
                } else if let Some(w) = wumpus.filter(|w| w.position == position) {
                    match w.state {
                        WumpusState::Alive => 'W',
                        WumpusState::Dead => 'w',
                    }
                } else if self.world.has_gold(position) {
                    'G'
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
                if col < self.world.width() - 1 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        write!(
            f,
            "agent {} facing {}, gold: {}, arrow: {}, score: {}",
            self.agent.position,
            self.agent.orientation,
            self.agent.has_gold,
            self.agent.has_arrow,
            self.score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(world: GridWorld) -> WumpusEnvironment {
        WumpusEnvironment::new(world, ActionResolver::new(RewardConfig::default(), true))
    }

    #[test]
    fn test_bump_is_reported_once() {
        let world = GridWorld::builder(4, 4).build().unwrap();
        let mut env = environment(world);
        env.execute(Action::TurnRight).unwrap();
        env.execute(Action::MoveForward).unwrap();
        assert!(env.percept().bump);
        assert_eq!(env.agent().position, Position::START);

        env.execute(Action::TurnLeft).unwrap();
        assert!(!env.percept().bump);
    }

    #[test]
    fn test_scream_is_reported_once() {
        let world = GridWorld::builder(4, 4)
            .wumpus(Position::new(0, 2))
            .build()
            .unwrap();
        let mut env = environment(world);
        env.execute(Action::Shoot).unwrap();
        assert!(env.percept().scream);
        env.execute(Action::TurnLeft).unwrap();
        assert!(!env.percept().scream);
    }

    #[test]
    fn test_score_accumulates() {
        let world = GridWorld::builder(4, 4).build().unwrap();
        let mut env = environment(world);
        assert_eq!(env.execute_action(&Action::TurnLeft), Ok(-1));
        assert_eq!(env.execute_action(&Action::Shoot), Ok(-11));
        assert_eq!(env.score(), -12);
        assert_eq!(env.steps(), 2);
    }

    #[test]
    fn test_score_saturates_instead_of_overflowing() {
        let world = GridWorld::builder(4, 4).build().unwrap();
        let rewards = RewardConfig {
            step_cost: Score::MIN / 2,
            ..RewardConfig::default()
        };
        let mut env = WumpusEnvironment::new(world, ActionResolver::new(rewards, true));
        for _ in 0..3 {
            env.execute(Action::TurnLeft).unwrap();
        }
        assert_eq!(env.score(), Score::MIN);
    }

    #[test]
    fn test_no_actions_after_terminal() {
        let world = GridWorld::builder(4, 4).build().unwrap();
        let mut env = environment(world);
        env.execute(Action::Climb).unwrap();
        assert!(env.is_terminal());
        assert_eq!(env.outcome(), Some(Outcome::ClimbedWithoutGold));
        assert_eq!(
            env.execute(Action::TurnLeft),
            Err(WumpusError::EpisodeAlreadyTerminal { steps: 1 })
        );
        assert_eq!(env.steps(), 1);
    }

    #[test]
    fn test_debug_board() {
        let world = GridWorld::builder(3, 2)
            .pit(Position::new(0, 2))
            .wumpus(Position::new(1, 1))
            .gold(Position::new(1, 2))
            .build()
            .unwrap();
        let env = environment(world);
        let board = env.to_string();
        let mut lines = board.lines();
        assert_eq!(lines.next(), Some(". W G"));
        assert_eq!(lines.next(), Some("A . P"));
    }
}
