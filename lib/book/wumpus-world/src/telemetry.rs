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

//! Per-step records for display and export.

use serde::{Deserialize, Serialize};

use crate::{Action, Orientation, Outcome, PerceptBundle, Position, Score};

/// Everything that happened in one step, plus the state it left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based step number.
    pub step: u32,

    /// Action taken.
    pub action: Action,

    /// Reward for this step alone.
    pub reward: Score,

    /// Cumulative score after this step.
    pub score: Score,

    /// What the agent saw when choosing the action.
    pub percepts_before: PerceptBundle,

    /// What the agent sees after the action, including bump and scream.
    pub percepts_after: PerceptBundle,

    /// Agent cell after the action.
    pub position: Position,

    /// Agent orientation after the action.
    pub orientation: Orientation,

    /// Agent holds the gold.
    pub has_gold: bool,

    /// Agent still has its arrow.
    pub has_arrow: bool,

    /// The wumpus is alive.
    pub wumpus_alive: bool,

    /// The agent is alive.
    pub alive: bool,

    /// This step ended the episode.
    pub terminal: bool,

    /// How the episode ended, on the terminal step.
    pub outcome: Option<Outcome>,
}

/// Append-only record of an episode's steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryLog {
    records: Vec<StepRecord>,
}

impl TelemetryLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, record: StepRecord) {
        self.records.push(record);
    }

    /// Records in step order. Each call starts again from the first step.
    pub fn iter(&self) -> std::slice::Iter<'_, StepRecord> {
        self.records.iter()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a TelemetryLog {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
