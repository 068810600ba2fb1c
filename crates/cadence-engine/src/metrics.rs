//! Chart queries over recorded snapshots.
//!
//! The engine is read-only: every series is derived from snapshot rows,
//! with one exception. A day equal to "today" that has no row yet is
//! recomputed live with the same formulas the recorder uses, so charts
//! are current up to now. Future days never produce actual values, and
//! days the recorder missed are left empty rather than interpolated.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::RwLock;

use cadence_core::{CadenceError, CadenceResult};
use cadence_domain::{
    progress, BoardId, BurndownPoint, BurndownSeries, BurnupPoint, BurnupSeries, ChartMode,
    CumulativeFlowPoint, CumulativeFlowSeries, MetricsSnapshot, Sprint, SprintId, SprintProgress,
    SprintStats, SprintStatus, VelocityEntry, VelocitySeries,
};

use crate::provider::BoardData;
use crate::state::EngineState;

#[derive(Clone)]
pub struct MetricsEngine {
    state: Arc<RwLock<EngineState>>,
    data: Arc<dyn BoardData>,
}

impl MetricsEngine {
    pub(crate) fn new(state: Arc<RwLock<EngineState>>, data: Arc<dyn BoardData>) -> Self {
        Self { state, data }
    }

    /// Live totals for a sprint plus its calendar position. Never reads
    /// snapshots; this is the "right now" view.
    pub fn get_sprint_stats(&self, sprint_id: SprintId) -> CadenceResult<SprintStats> {
        let sprint = self.require_sprint(sprint_id)?;
        let measured = self.live_progress(&sprint)?;
        Ok(stats_from(&measured, &sprint, Utc::now()))
    }

    pub fn get_burndown(
        &self,
        sprint_id: SprintId,
        mode: ChartMode,
    ) -> CadenceResult<BurndownSeries> {
        let sprint = self.require_sprint(sprint_id)?;
        let today = Utc::now().date_naive();
        let live = self.live_today(&sprint, today)?;

        let state = self.state.read();
        let snapshots = state.snapshots_for_sprint(sprint_id);
        Ok(build_burndown(&sprint, &snapshots, live.as_ref(), mode, today))
    }

    pub fn get_burnup(&self, sprint_id: SprintId, mode: ChartMode) -> CadenceResult<BurnupSeries> {
        let sprint = self.require_sprint(sprint_id)?;
        let today = Utc::now().date_naive();
        let live = self.live_today(&sprint, today)?;

        let state = self.state.read();
        let snapshots = state.snapshots_for_sprint(sprint_id);
        Ok(build_burnup(&sprint, &snapshots, live.as_ref(), mode, today))
    }

    /// Final completed work of the board's last N closed sprints, most
    /// recently closed first. Values come from each sprint's closure-time
    /// snapshot and are never recomputed from live state.
    pub fn get_velocity(
        &self,
        board_id: BoardId,
        sprint_count: usize,
        mode: ChartMode,
    ) -> CadenceResult<VelocitySeries> {
        let state = self.state.read();
        let mut closed: Vec<&Sprint> = state
            .sprints
            .iter()
            .filter(|s| s.board_id == board_id && s.status == SprintStatus::Closed)
            .collect();
        closed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let entries = closed
            .into_iter()
            .take(sprint_count)
            .map(|sprint| {
                let completed = state
                    .latest_snapshot(sprint.id)
                    .map(|snapshot| snapshot_totals(snapshot, mode).1)
                    .unwrap_or(0);
                VelocityEntry {
                    sprint_id: sprint.id,
                    sprint_name: sprint.name.clone(),
                    completed,
                }
            })
            .collect();

        Ok(VelocitySeries { mode, entries })
    }

    /// Per-column card counts for each recorded day in the sprint range.
    /// Days without a snapshot are omitted.
    pub fn get_cumulative_flow(&self, sprint_id: SprintId) -> CadenceResult<CumulativeFlowSeries> {
        let sprint = self.require_sprint(sprint_id)?;
        let state = self.state.read();
        let snapshots = state.snapshots_for_sprint(sprint_id);
        Ok(build_cumulative_flow(&sprint, &snapshots))
    }

    fn require_sprint(&self, sprint_id: SprintId) -> CadenceResult<Sprint> {
        self.state
            .read()
            .find_sprint(sprint_id)
            .cloned()
            .ok_or_else(|| CadenceError::not_found("sprint", sprint_id))
    }

    fn live_progress(&self, sprint: &Sprint) -> CadenceResult<SprintProgress> {
        let member_ids = self.state.read().memberships.cards_for_sprint(sprint.id);
        let cards = self.data.cards_by_ids(&member_ids)?;
        let columns = self.data.columns_for_board(sprint.board_id)?;
        Ok(progress::measure(&cards, &columns))
    }

    /// Live recomputation for "today" when the recorder has not run yet.
    /// Only an active sprint has a meaningful live membership; closed
    /// sprints end on their recorded history.
    fn live_today(
        &self,
        sprint: &Sprint,
        today: NaiveDate,
    ) -> CadenceResult<Option<SprintProgress>> {
        if sprint.status != SprintStatus::Active {
            return Ok(None);
        }
        if self.state.read().snapshot_on(sprint.id, today).is_some() {
            return Ok(None);
        }
        self.live_progress(sprint).map(Some)
    }
}

// --- pure builders ---

/// (scope, done) for a snapshot row under the given mode.
fn snapshot_totals(snapshot: &MetricsSnapshot, mode: ChartMode) -> (u32, u32) {
    match mode {
        ChartMode::CardCount => (snapshot.total_cards, snapshot.completed_cards),
        ChartMode::StoryPoints => (
            snapshot.total_story_points,
            snapshot.completed_story_points,
        ),
    }
}

/// (scope, done) for a live measurement under the given mode.
fn progress_totals(progress: &SprintProgress, mode: ChartMode) -> (u32, u32) {
    match mode {
        ChartMode::CardCount => (progress.total_cards, progress.completed_cards),
        ChartMode::StoryPoints => (
            progress.total_story_points,
            progress.completed_story_points,
        ),
    }
}

fn sprint_day_range(sprint: &Sprint) -> Option<(NaiveDate, NaiveDate)> {
    match (sprint.start_date, sprint.end_date) {
        (Some(start), Some(end)) => {
            let (start, end) = (start.date_naive(), end.date_naive());
            (start <= end).then_some((start, end))
        }
        _ => None,
    }
}

pub(crate) fn stats_from(
    progress: &SprintProgress,
    sprint: &Sprint,
    now: DateTime<Utc>,
) -> SprintStats {
    let days_remaining = sprint
        .end_date
        .map(|end| days_ceil(end - now).max(0))
        .unwrap_or(0);
    let days_elapsed = sprint
        .start_date
        .map(|start| days_floor(now - start).max(0))
        .unwrap_or(0);

    SprintStats {
        total_cards: progress.total_cards,
        completed_cards: progress.completed_cards,
        total_story_points: progress.total_story_points,
        completed_story_points: progress.completed_story_points,
        days_remaining,
        days_elapsed,
    }
}

fn days_ceil(duration: Duration) -> i64 {
    (duration.num_seconds() as f64 / 86_400.0).ceil() as i64
}

fn days_floor(duration: Duration) -> i64 {
    (duration.num_seconds() as f64 / 86_400.0).floor() as i64
}

/// Ideal line from the initial scope down to zero at the end date; actual
/// line is scope minus completed per recorded day, live for today, absent
/// for the future.
pub(crate) fn build_burndown(
    sprint: &Sprint,
    snapshots: &[&MetricsSnapshot],
    live_today: Option<&SprintProgress>,
    mode: ChartMode,
    today: NaiveDate,
) -> BurndownSeries {
    let mut series = BurndownSeries {
        sprint_id: sprint.id,
        mode,
        points: Vec::new(),
    };
    let Some((start, end)) = sprint_day_range(sprint) else {
        return series;
    };

    // The ideal line anchors on the earliest known scope; snapshots are
    // already ordered by date.
    let initial_scope = snapshots
        .first()
        .map(|s| snapshot_totals(s, mode).0)
        .or_else(|| live_today.map(|p| progress_totals(p, mode).0))
        .unwrap_or(0);

    let span = (end - start).num_days();
    let denom = span.max(1) as f64;

    for offset in 0..=span {
        let date = start + Duration::days(offset);
        let ideal = initial_scope as f64 * (span - offset) as f64 / denom;

        let actual = snapshots
            .iter()
            .find(|s| s.recorded_date == date)
            .map(|s| {
                let (scope, done) = snapshot_totals(s, mode);
                scope.saturating_sub(done)
            })
            .or_else(|| {
                (date == today)
                    .then(|| {
                        live_today.map(|p| {
                            let (scope, done) = progress_totals(p, mode);
                            scope.saturating_sub(done)
                        })
                    })
                    .flatten()
            });

        series.points.push(BurndownPoint {
            date,
            ideal,
            actual,
        });
    }
    series
}

/// Scope and done lines per day; scope can climb when cards are added
/// mid-sprint. Sourcing mirrors the burndown rules.
pub(crate) fn build_burnup(
    sprint: &Sprint,
    snapshots: &[&MetricsSnapshot],
    live_today: Option<&SprintProgress>,
    mode: ChartMode,
    today: NaiveDate,
) -> BurnupSeries {
    let mut series = BurnupSeries {
        sprint_id: sprint.id,
        mode,
        points: Vec::new(),
    };
    let Some((start, end)) = sprint_day_range(sprint) else {
        return series;
    };

    let span = (end - start).num_days();
    for offset in 0..=span {
        let date = start + Duration::days(offset);

        let totals = snapshots
            .iter()
            .find(|s| s.recorded_date == date)
            .map(|s| snapshot_totals(s, mode))
            .or_else(|| {
                (date == today)
                    .then(|| live_today.map(|p| progress_totals(p, mode)))
                    .flatten()
            });

        series.points.push(BurnupPoint {
            date,
            scope: totals.map(|(scope, _)| scope),
            done: totals.map(|(_, done)| done),
        });
    }
    series
}

/// One point per recorded day inside the sprint range, straight from each
/// snapshot's column counts. Without a date range, the whole history is
/// returned.
pub(crate) fn build_cumulative_flow(
    sprint: &Sprint,
    snapshots: &[&MetricsSnapshot],
) -> CumulativeFlowSeries {
    let range = sprint_day_range(sprint);
    let points = snapshots
        .iter()
        .filter(|s| match range {
            Some((start, end)) => s.recorded_date >= start && s.recorded_date <= end,
            None => true,
        })
        .map(|s| CumulativeFlowPoint {
            date: s.recorded_date,
            columns: s.column_snapshot.clone(),
        })
        .collect();

    CumulativeFlowSeries {
        sprint_id: sprint.id,
        points,
    }
}
