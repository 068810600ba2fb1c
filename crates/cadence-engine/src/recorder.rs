//! Daily progress snapshots for active sprints.
//!
//! Each pass ensures every active sprint has a `MetricsSnapshot` row for
//! the given calendar day. The (sprint, date) upsert makes re-running a
//! pass a safe no-op, and a failure on one sprint never aborts the rest
//! of the pass.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;

use cadence_core::{CadenceError, CadenceResult};
use cadence_domain::{progress, MetricsSnapshot, SprintId, SprintStatus};

use crate::provider::BoardData;
use crate::state::EngineState;

/// Outcome of one recorder pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub recorded: usize,
    pub failed: usize,
}

#[derive(Clone)]
pub struct SnapshotRecorder {
    state: Arc<RwLock<EngineState>>,
    data: Arc<dyn BoardData>,
}

impl SnapshotRecorder {
    pub(crate) fn new(state: Arc<RwLock<EngineState>>, data: Arc<dyn BoardData>) -> Self {
        Self { state, data }
    }

    /// Record (or overwrite) the snapshot for one active sprint on the
    /// given day.
    pub fn record_sprint(
        &self,
        sprint_id: SprintId,
        date: NaiveDate,
    ) -> CadenceResult<MetricsSnapshot> {
        let (board_id, member_ids) = {
            let state = self.state.read();
            let sprint = state
                .find_sprint(sprint_id)
                .ok_or_else(|| CadenceError::not_found("sprint", sprint_id))?;
            if sprint.status != SprintStatus::Active {
                return Err(CadenceError::InvalidState(format!(
                    "Sprint {} is {:?}; snapshots are recorded for Active sprints",
                    sprint_id, sprint.status
                )));
            }
            (sprint.board_id, state.memberships.cards_for_sprint(sprint_id))
        };

        let cards = self.data.cards_by_ids(&member_ids)?;
        let columns = self.data.columns_for_board(board_id)?;
        let measured = progress::measure(&cards, &columns);

        let snapshot = MetricsSnapshot::from_progress(sprint_id, date, measured);
        self.state.write().upsert_snapshot(snapshot.clone());

        tracing::debug!(
            sprint_id = %sprint_id,
            date = %date,
            total = snapshot.total_cards,
            completed = snapshot.completed_cards,
            "Recorded sprint snapshot"
        );
        Ok(snapshot)
    }

    /// One pass over every active sprint. Per-sprint failures are logged
    /// and counted, never propagated.
    pub fn record_active_sprints(&self, date: NaiveDate) -> PassSummary {
        let active_ids: Vec<SprintId> = {
            let state = self.state.read();
            state
                .sprints
                .iter()
                .filter(|s| s.status == SprintStatus::Active)
                .map(|s| s.id)
                .collect()
        };

        let mut summary = PassSummary::default();
        for sprint_id in active_ids {
            match self.record_sprint(sprint_id, date) {
                Ok(_) => summary.recorded += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(
                        sprint_id = %sprint_id,
                        date = %date,
                        "Snapshot failed, continuing pass: {}",
                        e
                    );
                }
            }
        }
        summary
    }

    /// Run a pass dated today.
    pub fn record_today(&self) -> PassSummary {
        self.record_active_sprints(Utc::now().date_naive())
    }

    /// Spawn the periodic recorder task. Any interval of a day or less
    /// keeps the once-per-active-sprint-day guarantee; shorter intervals
    /// only overwrite the same rows.
    pub fn spawn_periodic(self, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let summary = self.record_today();
                if summary.recorded > 0 || summary.failed > 0 {
                    tracing::info!(
                        recorded = summary.recorded,
                        failed = summary.failed,
                        "Snapshot recorder pass finished"
                    );
                }
            }
        })
    }
}
