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

//! Percepts.

use serde::{Deserialize, Serialize};

/// The five boolean signals an agent receives each step. This is the only view of the world an
/// agent gets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerceptBundle {
    /// A live wumpus is in an orthogonally adjacent cell.
    pub stench: bool,

    /// A pit is in an orthogonally adjacent cell.
    pub breeze: bool,

    /// Gold is in the agent's cell.
    pub glitter: bool,

    /// The last move walked into the edge of the grid or a wall.
    pub bump: bool,

    /// The last shot killed the wumpus.
    pub scream: bool,
}

/// One-shot signals produced by a transition rather than derived from a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Events {
    /// See [`PerceptBundle::bump`].
    pub bump: bool,

    /// See [`PerceptBundle::scream`].
    pub scream: bool,
}

impl PerceptBundle {
    /// Attach the events of a transition to position-derived percepts.
    pub fn with_events(mut self, events: Events) -> Self {
        self.bump = events.bump;
        self.scream = events.scream;
        self
    }
}

// classic percept vector order: [stench, breeze, glitter, bump, scream]
impl std::fmt::Display for PerceptBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = |on: bool, name: &'static str| if on { name } else { "None" };
        write!(
            f,
            "[{}, {}, {}, {}, {}]",
            slot(self.stench, "Stench"),
            slot(self.breeze, "Breeze"),
            slot(self.glitter, "Glitter"),
            slot(self.bump, "Bump"),
            slot(self.scream, "Scream"),
        )
    }
}
