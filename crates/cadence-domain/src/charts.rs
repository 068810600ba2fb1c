//! Chart payload shapes returned by the metrics queries.
//!
//! Pure data, serialized as-is to consumers. Dates are calendar days to
//! match the snapshot granularity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::column::ColumnId;
use crate::sprint::SprintId;

/// Which measure a burndown/burnup/velocity query reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartMode {
    CardCount,
    StoryPoints,
}

/// Live totals for a sprint plus its calendar position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintStats {
    pub total_cards: u32,
    pub completed_cards: u32,
    pub total_story_points: u32,
    pub completed_story_points: u32,
    pub days_remaining: i64,
    pub days_elapsed: i64,
}

/// One burndown day: the ideal line always has a value inside the sprint
/// range; the actual line stops at today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurndownPoint {
    pub date: NaiveDate,
    pub ideal: f64,
    pub actual: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BurndownSeries {
    pub sprint_id: SprintId,
    pub mode: ChartMode,
    pub points: Vec<BurndownPoint>,
}

/// One burnup day: scope can grow mid-sprint, done climbs toward it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnupPoint {
    pub date: NaiveDate,
    pub scope: Option<u32>,
    pub done: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BurnupSeries {
    pub sprint_id: SprintId,
    pub mode: ChartMode,
    pub points: Vec<BurnupPoint>,
}

/// Final completed work of one closed sprint, frozen at closure time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VelocityEntry {
    pub sprint_id: SprintId,
    pub sprint_name: String,
    pub completed: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VelocitySeries {
    pub mode: ChartMode,
    pub entries: Vec<VelocityEntry>,
}

/// One recorded day of per-column card counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CumulativeFlowPoint {
    pub date: NaiveDate,
    pub columns: HashMap<ColumnId, u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CumulativeFlowSeries {
    pub sprint_id: SprintId,
    pub points: Vec<CumulativeFlowPoint>,
}

impl Default for ChartMode {
    fn default() -> Self {
        Self::CardCount
    }
}
