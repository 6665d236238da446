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

//! Baseline agent.

use rand::{Rng as _, SeedableRng};

use crate::{Action, Agent, PerceptBundle, Rng};

/// Baseline agent: picks uniformly among the legal actions. After a bump it leaves out
/// `MoveForward`, since a bump means it still faces the same wall and moving again would bump
/// again. It keeps no memory between steps.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: Rng,
}

impl RandomAgent {
    /// Create an agent with its own seeded generator.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Agent for RandomAgent {
    type Action = Action;
    type Percept = PerceptBundle;

    fn choose_action(&mut self, percept: &Self::Percept) -> Self::Action {
        let choices: &[Action] = if percept.bump {
            &Action::ALL[1..]
        } else {
            &Action::ALL
        };
        choices[self.rng.gen_range(0..choices.len())]
    }

    fn reset(&mut self, seed: u64) {
        self.rng = Rng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_choices() {
        let mut a = RandomAgent::new(11);
        let mut b = RandomAgent::new(11);
        let percept = PerceptBundle::default();
        for _ in 0..100 {
            assert_eq!(a.choose_action(&percept), b.choose_action(&percept));
        }
    }

    #[test]
    fn test_reset_replays_choices() {
        let mut agent = RandomAgent::new(5);
        let percept = PerceptBundle::default();
        let first: Vec<Action> = (0..20).map(|_| agent.choose_action(&percept)).collect();
        agent.reset(5);
        let second: Vec<Action> = (0..20).map(|_| agent.choose_action(&percept)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_action_gets_chosen() {
        let mut agent = RandomAgent::new(0);
        let percept = PerceptBundle::default();
        let chosen: Vec<Action> = (0..600).map(|_| agent.choose_action(&percept)).collect();
        for action in Action::ALL {
            assert!(chosen.contains(&action), "never chose {}", action);
        }
    }

    #[test]
    fn test_never_moves_forward_after_bump() {
        let mut agent = RandomAgent::new(0);
        let percept = PerceptBundle {
            bump: true,
            ..PerceptBundle::default()
        };
        for _ in 0..1000 {
            assert_ne!(agent.choose_action(&percept), Action::MoveForward);
        }
    }
}
