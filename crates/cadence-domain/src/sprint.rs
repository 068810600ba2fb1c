use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::column::BoardId;

pub type SprintId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SprintStatus {
    Future,
    Active,
    Closed,
}

/// A time-boxed unit of work scoped to one board.
///
/// Lifecycle is forward-only: `Future` → `Active` → `Closed`. The mutators
/// here apply the transition unconditionally; preconditions (status checks,
/// the single-active-sprint invariant) are enforced by the lifecycle
/// manager, which serializes transitions per board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    pub id: SprintId,
    pub board_id: BoardId,
    pub name: String,
    pub goal: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: SprintStatus,
    /// Ordering among the board's Future sprints.
    pub position: i32,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sprint {
    pub fn new(
        board_id: BoardId,
        name: String,
        goal: Option<String>,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
        created_by: Uuid,
        position: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            name,
            goal,
            start_date,
            end_date,
            status: SprintStatus::Future,
            position,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition to `Active`. A missing start date is filled with now so
    /// chart queries always have a range origin.
    pub fn start(&mut self) {
        self.status = SprintStatus::Active;
        if self.start_date.is_none() {
            self.start_date = Some(Utc::now());
        }
        self.updated_at = Utc::now();
    }

    /// Transition to `Closed`. The planned end date is left as-is; the
    /// closure instant is observable through `updated_at`.
    pub fn close(&mut self) {
        self.status = SprintStatus::Closed;
        self.updated_at = Utc::now();
    }

    pub fn is_ended(&self) -> bool {
        if self.status != SprintStatus::Active {
            return false;
        }
        match self.end_date {
            Some(end_date) => Utc::now() > end_date,
            None => false,
        }
    }

    /// Apply partial changes. Status is deliberately absent: lifecycle
    /// transitions own the status field.
    pub fn apply_update(&mut self, updates: SprintUpdate) {
        if let Some(name) = updates.name {
            self.name = name;
        }
        if let Some(goal) = updates.goal {
            self.goal = goal;
        }
        if let Some(start_date) = updates.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = updates.end_date {
            self.end_date = end_date;
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update struct for Sprint
#[derive(Debug, Clone, Default)]
pub struct SprintUpdate {
    pub name: Option<String>,
    pub goal: Option<Option<String>>,
    pub start_date: Option<Option<DateTime<Utc>>>,
    pub end_date: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_sprint() -> Sprint {
        Sprint::new(
            Uuid::new_v4(),
            "Sprint 1".to_string(),
            None,
            None,
            None,
            Uuid::new_v4(),
            0,
        )
    }

    #[test]
    fn test_new_sprint_is_future() {
        let sprint = test_sprint();
        assert_eq!(sprint.status, SprintStatus::Future);
        assert!(sprint.start_date.is_none());
    }

    #[test]
    fn test_start_fills_missing_start_date() {
        let mut sprint = test_sprint();
        sprint.start();

        assert_eq!(sprint.status, SprintStatus::Active);
        assert!(sprint.start_date.is_some());
    }

    #[test]
    fn test_start_keeps_planned_start_date() {
        let mut sprint = test_sprint();
        let planned = Utc::now() - chrono::Duration::days(3);
        sprint.start_date = Some(planned);
        sprint.start();

        assert_eq!(sprint.start_date, Some(planned));
    }

    #[test]
    fn test_close_preserves_end_date() {
        let mut sprint = test_sprint();
        let planned_end = Utc::now() + chrono::Duration::days(7);
        sprint.end_date = Some(planned_end);
        sprint.start();
        sprint.close();

        assert_eq!(sprint.status, SprintStatus::Closed);
        assert_eq!(sprint.end_date, Some(planned_end));
    }

    #[test]
    fn test_is_ended() {
        let mut sprint = test_sprint();
        assert!(!sprint.is_ended());

        sprint.start();
        sprint.end_date = Some(Utc::now() - chrono::Duration::hours(1));
        assert!(sprint.is_ended());

        sprint.close();
        assert!(!sprint.is_ended());
    }

    #[test]
    fn test_apply_update_clears_goal() {
        let mut sprint = test_sprint();
        sprint.goal = Some("Ship it".to_string());

        sprint.apply_update(SprintUpdate {
            goal: Some(None),
            ..Default::default()
        });
        assert!(sprint.goal.is_none());

        // No-change update leaves fields alone
        sprint.apply_update(SprintUpdate::default());
        assert!(sprint.goal.is_none());
        assert_eq!(sprint.name, "Sprint 1");
    }
}
