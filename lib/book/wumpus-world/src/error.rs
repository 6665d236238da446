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

//! Errors returned by the engine.

/// Wumpus World error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WumpusError {
    /// The action token does not name one of the legal actions.
    #[error("invalid action: {0:?}")]
    InvalidAction(String),

    /// The world or reward configuration cannot produce a valid world.
    #[error("configuration out of bounds: {0}")]
    OutOfBoundsConfig(String),

    /// A step was requested after the episode ended.
    #[error("episode already terminal after {steps} steps")]
    EpisodeAlreadyTerminal {
        /// Steps taken before the episode ended.
        steps: u32,
    },
}
