//! Card ↔ sprint membership join table.
//!
//! A card can belong to zero sprints (the backlog), one sprint, or several
//! at once (carried over from a prior sprint while also pulled into a new
//! one). The table owns the cardinality invariant: at most one row per
//! (card, sprint) pair.
//!
//! Clearing semantics are asymmetric and deliberately kept as separate
//! operations: `clear_card` removes every membership the card holds (the
//! backlog move), while `remove` and `remove_sprint` are scoped to a
//! single sprint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::CardId;
use crate::sprint::SprintId;

/// One edge of the many-to-many card/sprint relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardSprintMembership {
    pub card_id: CardId,
    pub sprint_id: SprintId,
    pub added_at: DateTime<Utc>,
}

impl CardSprintMembership {
    pub fn new(card_id: CardId, sprint_id: SprintId) -> Self {
        Self {
            card_id,
            sprint_id,
            added_at: Utc::now(),
        }
    }
}

/// In-memory join table over membership rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipTable {
    rows: Vec<CardSprintMembership>,
}

impl MembershipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from persisted rows, dropping duplicate (card, sprint)
    /// pairs. The first row for a pair wins, keeping its stored timestamp.
    pub fn from_rows(rows: Vec<CardSprintMembership>) -> Self {
        let mut table = Self::new();
        for row in rows {
            if !table.contains(row.card_id, row.sprint_id) {
                table.rows.push(row);
            }
        }
        table
    }

    pub fn rows(&self) -> &[CardSprintMembership] {
        &self.rows
    }

    pub fn contains(&self, card_id: CardId, sprint_id: SprintId) -> bool {
        self.rows
            .iter()
            .any(|r| r.card_id == card_id && r.sprint_id == sprint_id)
    }

    /// Add an edge. Adding an existing edge is a no-op; returns whether a
    /// row was inserted.
    pub fn add(&mut self, card_id: CardId, sprint_id: SprintId) -> bool {
        if self.contains(card_id, sprint_id) {
            return false;
        }
        self.rows.push(CardSprintMembership::new(card_id, sprint_id));
        true
    }

    /// Remove one edge. Removing a missing edge is a no-op; returns whether
    /// a row was deleted.
    pub fn remove(&mut self, card_id: CardId, sprint_id: SprintId) -> bool {
        let before = self.rows.len();
        self.rows
            .retain(|r| !(r.card_id == card_id && r.sprint_id == sprint_id));
        self.rows.len() != before
    }

    /// Replace the card's full membership set with exactly the given
    /// sprints: rows not in the new set are deleted, missing ones are
    /// added, existing ones keep their `added_at`.
    pub fn set_card_sprints(&mut self, card_id: CardId, sprint_ids: &[SprintId]) {
        self.rows
            .retain(|r| r.card_id != card_id || sprint_ids.contains(&r.sprint_id));
        for &sprint_id in sprint_ids {
            self.add(card_id, sprint_id);
        }
    }

    /// Remove every membership the card holds, across all sprints.
    pub fn clear_card(&mut self, card_id: CardId) -> usize {
        let before = self.rows.len();
        self.rows.retain(|r| r.card_id != card_id);
        before - self.rows.len()
    }

    /// Remove every membership row for a sprint (sprint-delete cascade).
    pub fn remove_sprint(&mut self, sprint_id: SprintId) -> usize {
        let before = self.rows.len();
        self.rows.retain(|r| r.sprint_id != sprint_id);
        before - self.rows.len()
    }

    pub fn cards_for_sprint(&self, sprint_id: SprintId) -> Vec<CardId> {
        self.rows
            .iter()
            .filter(|r| r.sprint_id == sprint_id)
            .map(|r| r.card_id)
            .collect()
    }

    pub fn sprints_for_card(&self, card_id: CardId) -> Vec<SprintId> {
        self.rows
            .iter()
            .filter(|r| r.card_id == card_id)
            .map(|r| r.sprint_id)
            .collect()
    }

    /// A card with zero memberships is in the backlog.
    pub fn is_backlog_card(&self, card_id: CardId) -> bool {
        !self.rows.iter().any(|r| r.card_id == card_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
