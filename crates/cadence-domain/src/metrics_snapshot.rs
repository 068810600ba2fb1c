use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::column::ColumnId;
use crate::progress::SprintProgress;
use crate::sprint::SprintId;

/// Frozen daily aggregate of one sprint's progress.
///
/// Rows are unique per (sprint, recorded date) and immutable once written;
/// they outlive the live card state they were computed from, which is what
/// makes historical charts possible after cards move on. Writes go through
/// an upsert on the unique key, so re-recording a day replaces rather than
/// duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub id: Uuid,
    pub sprint_id: SprintId,
    /// Calendar date the snapshot describes, not a timestamp.
    pub recorded_date: NaiveDate,
    pub total_cards: u32,
    pub completed_cards: u32,
    pub total_story_points: u32,
    pub completed_story_points: u32,
    /// Card count per board column at the moment of capture.
    #[serde(default)]
    pub column_snapshot: HashMap<ColumnId, u32>,
    pub created_at: DateTime<Utc>,
}

impl MetricsSnapshot {
    pub fn from_progress(
        sprint_id: SprintId,
        recorded_date: NaiveDate,
        progress: SprintProgress,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            sprint_id,
            recorded_date,
            total_cards: progress.total_cards,
            completed_cards: progress.completed_cards,
            total_story_points: progress.total_story_points,
            completed_story_points: progress.completed_story_points,
            column_snapshot: progress.column_counts,
            created_at: Utc::now(),
        }
    }
}
