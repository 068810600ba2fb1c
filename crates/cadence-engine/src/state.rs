//! Engine-owned rows: sprints, membership edges, metrics snapshots.
//!
//! `EngineState` lives behind one `RwLock`; a write guard over it is the
//! serialization point for lifecycle transitions, so the single-active
//! check and the status write can never interleave with another writer.

use chrono::NaiveDate;
use cadence_domain::{
    BoardId, MembershipTable, MetricsSnapshot, PersistedState, Sprint, SprintId, SprintStatus,
};

#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub sprints: Vec<Sprint>,
    pub memberships: MembershipTable,
    pub snapshots: Vec<MetricsSnapshot>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            sprints: persisted.sprints,
            memberships: MembershipTable::from_rows(persisted.memberships),
            snapshots: persisted.snapshots,
        }
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            sprints: self.sprints.clone(),
            memberships: self.memberships.rows().to_vec(),
            snapshots: self.snapshots.clone(),
        }
    }

    pub fn find_sprint(&self, sprint_id: SprintId) -> Option<&Sprint> {
        self.sprints.iter().find(|s| s.id == sprint_id)
    }

    pub fn find_sprint_mut(&mut self, sprint_id: SprintId) -> Option<&mut Sprint> {
        self.sprints.iter_mut().find(|s| s.id == sprint_id)
    }

    pub fn active_sprint_for_board(&self, board_id: BoardId) -> Option<&Sprint> {
        self.sprints
            .iter()
            .find(|s| s.board_id == board_id && s.status == SprintStatus::Active)
    }

    /// Next `position` for a new sprint on the board: one past the highest
    /// existing position, 0 for the board's first sprint.
    pub fn next_position_for_board(&self, board_id: BoardId) -> i32 {
        self.sprints
            .iter()
            .filter(|s| s.board_id == board_id)
            .map(|s| s.position)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0)
    }

    /// Insert or replace the snapshot for (sprint, recorded date). The
    /// unique key makes re-recording a day a safe overwrite, never a
    /// duplicate row.
    pub fn upsert_snapshot(&mut self, snapshot: MetricsSnapshot) {
        self.snapshots.retain(|s| {
            !(s.sprint_id == snapshot.sprint_id && s.recorded_date == snapshot.recorded_date)
        });
        self.snapshots.push(snapshot);
    }

    /// All snapshots for a sprint, ordered by recorded date.
    pub fn snapshots_for_sprint(&self, sprint_id: SprintId) -> Vec<&MetricsSnapshot> {
        let mut rows: Vec<&MetricsSnapshot> = self
            .snapshots
            .iter()
            .filter(|s| s.sprint_id == sprint_id)
            .collect();
        rows.sort_by_key(|s| s.recorded_date);
        rows
    }

    pub fn snapshot_on(&self, sprint_id: SprintId, date: NaiveDate) -> Option<&MetricsSnapshot> {
        self.snapshots
            .iter()
            .find(|s| s.sprint_id == sprint_id && s.recorded_date == date)
    }

    /// The latest-dated snapshot for a sprint; for a closed sprint this is
    /// the closure-time row velocity queries read.
    pub fn latest_snapshot(&self, sprint_id: SprintId) -> Option<&MetricsSnapshot> {
        self.snapshots
            .iter()
            .filter(|s| s.sprint_id == sprint_id)
            .max_by_key(|s| s.recorded_date)
    }
}
