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

//! The actions an agent can take.

use serde::{Deserialize, Serialize};

use crate::WumpusError;

/// The six legal actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Step one cell in the facing direction.
    MoveForward,

    /// Rotate 90 degrees counter-clockwise.
    TurnLeft,

    /// Rotate 90 degrees clockwise.
    TurnRight,

    /// Pick up gold in the current cell.
    Grab,

    /// Fire the single arrow in the facing direction.
    Shoot,

    /// Leave the cave from the exit cell.
    Climb,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 6] = [
        Action::MoveForward,
        Action::TurnLeft,
        Action::TurnRight,
        Action::Grab,
        Action::Shoot,
        Action::Climb,
    ];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Action::MoveForward => "MoveForward",
            Action::TurnLeft => "TurnLeft",
            Action::TurnRight => "TurnRight",
            Action::Grab => "Grab",
            Action::Shoot => "Shoot",
            Action::Climb => "Climb",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for Action {
    type Err = WumpusError;

    /// Parse an action token, ignoring case. Underscores and dashes are ignored so `move_forward`
    /// and `MoveForward` name the same action.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match token.as_str() {
            "forward" | "moveforward" | "f" => Ok(Action::MoveForward),
            "left" | "turnleft" | "l" => Ok(Action::TurnLeft),
            "right" | "turnright" | "r" => Ok(Action::TurnRight),
            "grab" | "g" => Ok(Action::Grab),
            "shoot" | "s" => Ok(Action::Shoot),
            "climb" | "c" => Ok(Action::Climb),
            _ => Err(WumpusError::InvalidAction(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parses_back() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>(), Ok(action));
        }
    }

    #[test]
    fn test_parse_accepts_common_spellings() {
        assert_eq!("move_forward".parse::<Action>(), Ok(Action::MoveForward));
        assert_eq!("TURN_LEFT".parse::<Action>(), Ok(Action::TurnLeft));
        assert_eq!(" r ".parse::<Action>(), Ok(Action::TurnRight));
        assert_eq!("Grab".parse::<Action>(), Ok(Action::Grab));
    }

    #[test]
    fn test_unknown_token_is_invalid_action() {
        assert_eq!(
            "jump".parse::<Action>(),
            Err(WumpusError::InvalidAction("jump".to_string()))
        );
        assert!(matches!(
            "".parse::<Action>(),
            Err(WumpusError::InvalidAction(_))
        ));
    }
}
