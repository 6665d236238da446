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

//! Reward and world generation settings.

use serde::{Deserialize, Serialize};

use crate::WumpusError;

/// Score units. Rewards and the cumulative score are whole numbers.
pub type Score = i64;

/// Rewards and the step budget for an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Charged for every action that does not end the episode by death or climbing.
    pub step_cost: Score,

    /// Charged on top of `step_cost` when an arrow is actually released.
    pub shoot_cost: Score,

    /// Reward for walking into a pit or a live wumpus.
    pub death_penalty: Score,

    /// Reward for climbing out of the exit cell while holding the gold.
    pub gold_bonus: Score,

    /// Reward for climbing out of the exit cell empty-handed.
    pub climb_without_gold_reward: Score,

    /// Added on top of `step_cost` when gold is picked up.
    pub grab_bonus: Score,

    /// Steps after which the episode times out.
    pub max_steps: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step_cost: -1,
            shoot_cost: -10,
            death_penalty: -1000,
            gold_bonus: 1000,
            climb_without_gold_reward: 0,
            grab_bonus: 0,
            max_steps: 200,
        }
    }
}

impl RewardConfig {
    /// Builder: set the step budget.
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Check the configuration can drive an episode.
    pub fn validate(&self) -> Result<(), WumpusError> {
        if self.max_steps == 0 {
            return Err(WumpusError::OutOfBoundsConfig(
                "max_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Shape and contents of randomly generated worlds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of columns.
    pub width: usize,

    /// Number of rows.
    pub height: usize,

    /// Probability that any non-start, non-wall cell holds a pit.
    pub pit_probability: f64,

    /// Number of interior walls.
    pub wall_count: usize,

    /// Whether climbing out without the gold ends the episode. When false it is a no-op.
    pub allow_climb_without_gold: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 4,
            height: 4,
            pit_probability: 0.2,
            wall_count: 0,
            allow_climb_without_gold: true,
        }
    }
}

impl WorldConfig {
    /// A square world with the default contents.
    pub fn square(size: usize) -> Self {
        Self {
            width: size,
            height: size,
            ..Self::default()
        }
    }

    /// Check that a world with this configuration can satisfy the placement rules.
    pub fn validate(&self) -> Result<(), WumpusError> {
        if self.width < 2 || self.height < 2 {
            return Err(WumpusError::OutOfBoundsConfig(format!(
                "grid must be at least 2x2, got {}x{}",
                self.width, self.height
            )));
        }
        if !(0.0..=1.0).contains(&self.pit_probability) {
            return Err(WumpusError::OutOfBoundsConfig(format!(
                "pit_probability must be in [0, 1], got {}",
                self.pit_probability
            )));
        }
        // the start cell is never a wall, and one more cell must stay free for gold and wumpus
        let free_cells = self.width * self.height - 1;
        if self.wall_count >= free_cells {
            return Err(WumpusError::OutOfBoundsConfig(format!(
                "{} walls leave no free cell in a {}x{} grid",
                self.wall_count, self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rewards_match_classic_values() {
        let config = RewardConfig::default();
        assert_eq!(config.step_cost, -1);
        assert_eq!(config.shoot_cost, -10);
        assert_eq!(config.death_penalty, -1000);
        assert_eq!(config.gold_bonus, 1000);
        assert_eq!(config.max_steps, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_steps_is_rejected() {
        let config = RewardConfig::default().with_max_steps(0);
        assert!(matches!(
            config.validate(),
            Err(WumpusError::OutOfBoundsConfig(_))
        ));
    }

    #[test]
    fn test_one_by_n_grid_is_rejected() {
        let config = WorldConfig {
            width: 1,
            height: 5,
            ..WorldConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(WumpusError::OutOfBoundsConfig(_))
        ));
    }

    #[test]
    fn test_bad_pit_probability_is_rejected() {
        let config = WorldConfig {
            pit_probability: 1.5,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_walls_filling_the_grid_are_rejected() {
        let config = WorldConfig {
            wall_count: 3,
            ..WorldConfig::square(2)
        };
        assert!(config.validate().is_err());

        let config = WorldConfig {
            wall_count: 2,
            ..WorldConfig::square(2)
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: RewardConfig = serde_json::from_str(r#"{"max_steps": 50}"#).unwrap();
        assert_eq!(config.max_steps, 50);
        assert_eq!(config.death_penalty, -1000);
    }
}
