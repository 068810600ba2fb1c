//! Sprint lifecycle and membership operations.
//!
//! Every transition runs under a single write guard over the engine state.
//! That guard is the per-board serialization point: the single-active
//! check and the status write in `start_sprint`, and the snapshot +
//! membership + status triple in `complete_sprint`, cannot interleave
//! with another writer. Fallible provider reads happen before the first
//! mutation, so a failed call leaves state untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use cadence_core::{CadenceError, CadenceResult, PageRequest, Paged};
use cadence_domain::{
    progress, BoardId, Card, CardId, MetricsSnapshot, Sprint, SprintId, SprintStatus, SprintUpdate,
};

use crate::provider::BoardData;
use crate::state::EngineState;

/// Inputs for `create_sprint`.
#[derive(Debug, Clone)]
pub struct CreateSprintRequest {
    pub board_id: BoardId,
    pub name: String,
    pub goal: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_by: Uuid,
}

#[derive(Clone)]
pub struct SprintLifecycleManager {
    state: Arc<RwLock<EngineState>>,
    data: Arc<dyn BoardData>,
}

impl SprintLifecycleManager {
    pub(crate) fn new(state: Arc<RwLock<EngineState>>, data: Arc<dyn BoardData>) -> Self {
        Self { state, data }
    }

    // --- sprint lifecycle ---

    /// Create a sprint in `Future` at the end of the board's ordering.
    pub fn create_sprint(&self, request: CreateSprintRequest) -> CadenceResult<Sprint> {
        if request.name.trim().is_empty() {
            return Err(CadenceError::Validation(
                "Sprint name must not be empty".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
            if end < start {
                return Err(CadenceError::Validation(
                    "Sprint end date must not precede start date".to_string(),
                ));
            }
        }

        let mut state = self.state.write();
        let position = state.next_position_for_board(request.board_id);
        let sprint = Sprint::new(
            request.board_id,
            request.name,
            request.goal,
            request.start_date,
            request.end_date,
            request.created_by,
            position,
        );
        state.sprints.push(sprint.clone());

        tracing::info!(
            sprint_id = %sprint.id,
            board_id = %sprint.board_id,
            "Created sprint '{}'",
            sprint.name
        );
        Ok(sprint)
    }

    /// Transition `Future` → `Active`, enforcing at most one active sprint
    /// per board. The existence check and the status write share one write
    /// guard, so concurrent starts on the same board cannot both succeed.
    pub fn start_sprint(&self, sprint_id: SprintId) -> CadenceResult<Sprint> {
        let mut state = self.state.write();

        let (board_id, status) = state
            .find_sprint(sprint_id)
            .map(|s| (s.board_id, s.status))
            .ok_or_else(|| CadenceError::not_found("sprint", sprint_id))?;

        if status != SprintStatus::Future {
            return Err(CadenceError::InvalidState(format!(
                "Sprint {} is {:?}; only Future sprints can be started",
                sprint_id, status
            )));
        }

        if let Some(active) = state.active_sprint_for_board(board_id) {
            return Err(CadenceError::AlreadyActive {
                board_id,
                active_sprint_id: active.id,
            });
        }

        let sprint = state
            .find_sprint_mut(sprint_id)
            .ok_or_else(|| CadenceError::not_found("sprint", sprint_id))?;
        sprint.start();
        let sprint = sprint.clone();

        tracing::info!(sprint_id = %sprint.id, board_id = %board_id, "Started sprint");
        Ok(sprint)
    }

    /// Transition `Active` → `Closed`.
    ///
    /// Records a final snapshot dated today from pre-mutation state, then
    /// optionally detaches incomplete cards from this sprint (their other
    /// memberships are untouched), then closes. Calling again fails with
    /// `InvalidState`; the side effects never re-run.
    pub fn complete_sprint(
        &self,
        sprint_id: SprintId,
        move_incomplete: bool,
    ) -> CadenceResult<Sprint> {
        let mut state = self.state.write();

        let (board_id, status) = state
            .find_sprint(sprint_id)
            .map(|s| (s.board_id, s.status))
            .ok_or_else(|| CadenceError::not_found("sprint", sprint_id))?;

        if status != SprintStatus::Active {
            return Err(CadenceError::InvalidState(format!(
                "Sprint {} is {:?}; only Active sprints can be completed",
                sprint_id, status
            )));
        }

        // All fallible reads happen before the first write.
        let member_ids = state.memberships.cards_for_sprint(sprint_id);
        let cards = self.data.cards_by_ids(&member_ids)?;
        let columns = self.data.columns_for_board(board_id)?;

        let today = Utc::now().date_naive();
        let measured = progress::measure(&cards, &columns);
        state.upsert_snapshot(MetricsSnapshot::from_progress(sprint_id, today, measured));

        if move_incomplete {
            let done = progress::done_column_ids(&columns);
            let (incomplete, _complete) = progress::partition_by_completion(&cards, &done);
            for card in incomplete {
                state.memberships.remove(card.id, sprint_id);
            }
        }

        let sprint = state
            .find_sprint_mut(sprint_id)
            .ok_or_else(|| CadenceError::not_found("sprint", sprint_id))?;
        sprint.close();
        let sprint = sprint.clone();

        tracing::info!(
            sprint_id = %sprint.id,
            board_id = %board_id,
            move_incomplete,
            "Completed sprint"
        );
        Ok(sprint)
    }

    /// Delete a sprint that has not started yet, cascading its membership
    /// rows. Sprints with history (Active or Closed) are not deletable.
    pub fn delete_sprint(&self, sprint_id: SprintId) -> CadenceResult<()> {
        let mut state = self.state.write();

        let status = state
            .find_sprint(sprint_id)
            .map(|s| s.status)
            .ok_or_else(|| CadenceError::not_found("sprint", sprint_id))?;

        if status != SprintStatus::Future {
            return Err(CadenceError::InvalidState(format!(
                "Sprint {} is {:?}; only Future sprints can be deleted",
                sprint_id, status
            )));
        }

        state.memberships.remove_sprint(sprint_id);
        state.sprints.retain(|s| s.id != sprint_id);

        tracing::info!(sprint_id = %sprint_id, "Deleted sprint");
        Ok(())
    }

    /// Apply a partial update to a sprint's descriptive fields. Closed
    /// sprints are frozen history.
    pub fn update_sprint(
        &self,
        sprint_id: SprintId,
        updates: SprintUpdate,
    ) -> CadenceResult<Sprint> {
        let mut state = self.state.write();

        let sprint = state
            .find_sprint_mut(sprint_id)
            .ok_or_else(|| CadenceError::not_found("sprint", sprint_id))?;

        if sprint.status == SprintStatus::Closed {
            return Err(CadenceError::InvalidState(format!(
                "Sprint {} is Closed and cannot be edited",
                sprint_id
            )));
        }

        sprint.apply_update(updates);
        Ok(sprint.clone())
    }

    // --- card/sprint membership ---

    /// Attach a card to a sprint. Attaching twice is a no-op success.
    pub fn add_card_to_sprint(&self, card_id: CardId, sprint_id: SprintId) -> CadenceResult<()> {
        self.require_card(card_id)?;

        let mut state = self.state.write();
        if state.find_sprint(sprint_id).is_none() {
            return Err(CadenceError::not_found("sprint", sprint_id));
        }
        state.memberships.add(card_id, sprint_id);
        Ok(())
    }

    /// Detach a card from one sprint. Removing a missing edge is a no-op
    /// success.
    pub fn remove_card_from_sprint(
        &self,
        card_id: CardId,
        sprint_id: SprintId,
    ) -> CadenceResult<()> {
        let mut state = self.state.write();
        state.memberships.remove(card_id, sprint_id);
        Ok(())
    }

    /// Replace the card's membership set with exactly the given sprints.
    pub fn set_card_sprints(&self, card_id: CardId, sprint_ids: &[SprintId]) -> CadenceResult<()> {
        self.require_card(card_id)?;

        let mut state = self.state.write();
        for &sprint_id in sprint_ids {
            if state.find_sprint(sprint_id).is_none() {
                return Err(CadenceError::not_found("sprint", sprint_id));
            }
        }
        state.memberships.set_card_sprints(card_id, sprint_ids);
        Ok(())
    }

    /// Remove every sprint membership the card holds. This is the backlog
    /// move; it is unrelated to moving a card between kanban columns.
    pub fn move_card_to_backlog(&self, card_id: CardId) -> CadenceResult<()> {
        self.require_card(card_id)?;

        let mut state = self.state.write();
        let removed = state.memberships.clear_card(card_id);
        tracing::debug!(card_id = %card_id, removed, "Moved card to backlog");
        Ok(())
    }

    // --- queries ---

    pub fn get_sprint(&self, sprint_id: SprintId) -> CadenceResult<Option<Sprint>> {
        Ok(self.state.read().find_sprint(sprint_id).cloned())
    }

    pub fn get_active_sprint(&self, board_id: BoardId) -> CadenceResult<Option<Sprint>> {
        Ok(self.state.read().active_sprint_for_board(board_id).cloned())
    }

    /// Future sprints of a board, in planning order.
    pub fn get_future_sprints(&self, board_id: BoardId) -> CadenceResult<Vec<Sprint>> {
        let state = self.state.read();
        let mut sprints: Vec<Sprint> = state
            .sprints
            .iter()
            .filter(|s| s.board_id == board_id && s.status == SprintStatus::Future)
            .cloned()
            .collect();
        sprints.sort_by_key(|s| s.position);
        Ok(sprints)
    }

    /// Closed sprints of a board, most recently closed first. The status
    /// write during completion bumps `updated_at`, which is the closure
    /// instant this ordering uses.
    pub fn get_closed_sprints(
        &self,
        board_id: BoardId,
        page: PageRequest,
    ) -> CadenceResult<Paged<Sprint>> {
        let state = self.state.read();
        let mut sprints: Vec<Sprint> = state
            .sprints
            .iter()
            .filter(|s| s.board_id == board_id && s.status == SprintStatus::Closed)
            .cloned()
            .collect();
        sprints.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(Paged::from_slice(&sprints, page))
    }

    /// Cards currently attached to a sprint.
    pub fn get_sprint_cards(&self, sprint_id: SprintId) -> CadenceResult<Vec<Card>> {
        let member_ids = {
            let state = self.state.read();
            if state.find_sprint(sprint_id).is_none() {
                return Err(CadenceError::not_found("sprint", sprint_id));
            }
            state.memberships.cards_for_sprint(sprint_id)
        };
        self.data.cards_by_ids(&member_ids)
    }

    /// Cards on the board with zero sprint memberships.
    pub fn get_backlog_cards(&self, board_id: BoardId) -> CadenceResult<Vec<Card>> {
        let cards = self.data.cards_for_board(board_id)?;
        let state = self.state.read();
        Ok(cards
            .into_iter()
            .filter(|card| state.memberships.is_backlog_card(card.id))
            .collect())
    }

    fn require_card(&self, card_id: CardId) -> CadenceResult<()> {
        match self.data.card(card_id)? {
            Some(_) => Ok(()),
            None => Err(CadenceError::not_found("card", card_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryBoardData;
    use cadence_domain::Column;

    struct Fixture {
        manager: SprintLifecycleManager,
        state: Arc<RwLock<EngineState>>,
        data: Arc<InMemoryBoardData>,
        board_id: BoardId,
        todo: Column,
        done: Column,
    }

    fn fixture() -> Fixture {
        let board_id = Uuid::new_v4();
        let todo = Column::new(board_id, "Todo".to_string(), 0, false);
        let done = Column::new(board_id, "Done".to_string(), 1, true);

        let data = Arc::new(InMemoryBoardData::new());
        data.insert_column(todo.clone());
        data.insert_column(done.clone());

        let state = Arc::new(RwLock::new(EngineState::new()));
        let manager = SprintLifecycleManager::new(state.clone(), data.clone());

        Fixture {
            manager,
            state,
            data,
            board_id,
            todo,
            done,
        }
    }

    impl Fixture {
        fn create_sprint(&self, name: &str) -> Sprint {
            self.manager
                .create_sprint(CreateSprintRequest {
                    board_id: self.board_id,
                    name: name.to_string(),
                    goal: None,
                    start_date: None,
                    end_date: None,
                    created_by: Uuid::new_v4(),
                })
                .unwrap()
        }

        fn card_in(&self, column: &Column, points: Option<u32>) -> Card {
            let mut card = Card::new(self.board_id, column.id, "Task".to_string());
            card.points = points;
            self.data.insert_card(card.clone());
            card
        }
    }

    // --- create / positions ---

    #[test]
    fn create_assigns_sequential_positions() {
        let fx = fixture();

        let s1 = fx.create_sprint("Sprint 1");
        let s2 = fx.create_sprint("Sprint 2");

        assert_eq!(s1.position, 0);
        assert_eq!(s2.position, 1);
        assert_eq!(s1.status, SprintStatus::Future);
    }

    #[test]
    fn create_rejects_blank_name() {
        let fx = fixture();
        let result = fx.manager.create_sprint(CreateSprintRequest {
            board_id: fx.board_id,
            name: "   ".to_string(),
            goal: None,
            start_date: None,
            end_date: None,
            created_by: Uuid::new_v4(),
        });

        assert!(matches!(result, Err(CadenceError::Validation(_))));
    }

    #[test]
    fn create_rejects_inverted_dates() {
        let fx = fixture();
        let now = Utc::now();
        let result = fx.manager.create_sprint(CreateSprintRequest {
            board_id: fx.board_id,
            name: "Sprint".to_string(),
            goal: None,
            start_date: Some(now),
            end_date: Some(now - chrono::Duration::days(1)),
            created_by: Uuid::new_v4(),
        });

        assert!(matches!(result, Err(CadenceError::Validation(_))));
    }

    #[test]
    fn create_then_future_sprints_lists_it() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");

        let future = fx.manager.get_future_sprints(fx.board_id).unwrap();
        assert_eq!(future.len(), 1);
        assert_eq!(future[0].id, sprint.id);
        assert_eq!(future[0].status, SprintStatus::Future);
        assert_eq!(future[0].position, 0);
    }

    // --- start ---

    #[test]
    fn start_transitions_future_to_active() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");

        let started = fx.manager.start_sprint(sprint.id).unwrap();
        assert_eq!(started.status, SprintStatus::Active);
        assert!(started.start_date.is_some());

        let active = fx.manager.get_active_sprint(fx.board_id).unwrap();
        assert_eq!(active.unwrap().id, sprint.id);
    }

    #[test]
    fn start_rejects_non_future_sprint() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");
        fx.manager.start_sprint(sprint.id).unwrap();

        let result = fx.manager.start_sprint(sprint.id);
        assert!(matches!(result, Err(CadenceError::InvalidState(_))));
    }

    #[test]
    fn start_rejects_second_active_on_same_board() {
        let fx = fixture();
        let s1 = fx.create_sprint("Sprint 1");
        let s2 = fx.create_sprint("Sprint 2");

        fx.manager.start_sprint(s1.id).unwrap();
        let result = fx.manager.start_sprint(s2.id);

        match result {
            Err(CadenceError::AlreadyActive {
                board_id,
                active_sprint_id,
            }) => {
                assert_eq!(board_id, fx.board_id);
                assert_eq!(active_sprint_id, s1.id);
            }
            other => panic!("expected AlreadyActive, got {:?}", other.map(|s| s.id)),
        }
    }

    #[test]
    fn start_allows_active_sprints_on_different_boards() {
        let fx = fixture();
        let s1 = fx.create_sprint("Sprint 1");
        fx.manager.start_sprint(s1.id).unwrap();

        let other_board = Uuid::new_v4();
        let s2 = fx
            .manager
            .create_sprint(CreateSprintRequest {
                board_id: other_board,
                name: "Elsewhere".to_string(),
                goal: None,
                start_date: None,
                end_date: None,
                created_by: Uuid::new_v4(),
            })
            .unwrap();

        assert!(fx.manager.start_sprint(s2.id).is_ok());
    }

    #[test]
    fn concurrent_starts_admit_exactly_one_active() {
        let fx = fixture();
        let s1 = fx.create_sprint("Sprint 1");
        let s2 = fx.create_sprint("Sprint 2");

        let m1 = fx.manager.clone();
        let m2 = fx.manager.clone();
        let t1 = std::thread::spawn(move || m1.start_sprint(s1.id));
        let t2 = std::thread::spawn(move || m2.start_sprint(s2.id));

        let results = [t1.join().unwrap(), t2.join().unwrap()];
        let ok_count = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(ok_count, 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(CadenceError::AlreadyActive { .. }))));

        let state = fx.state.read();
        let active = state
            .sprints
            .iter()
            .filter(|s| s.status == SprintStatus::Active)
            .count();
        assert_eq!(active, 1);
    }

    // --- complete ---

    #[test]
    fn complete_moves_incomplete_cards_out_of_this_sprint_only() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");
        let next = fx.create_sprint("Sprint 2");
        fx.manager.start_sprint(sprint.id).unwrap();

        let finished = fx.card_in(&fx.done, Some(3));
        let unfinished = fx.card_in(&fx.todo, Some(5));
        fx.manager.add_card_to_sprint(finished.id, sprint.id).unwrap();
        fx.manager
            .add_card_to_sprint(unfinished.id, sprint.id)
            .unwrap();
        // The unfinished card was also pulled into the next sprint.
        fx.manager.add_card_to_sprint(unfinished.id, next.id).unwrap();

        fx.manager.complete_sprint(sprint.id, true).unwrap();

        let state = fx.state.read();
        assert!(state.memberships.contains(finished.id, sprint.id));
        assert!(!state.memberships.contains(unfinished.id, sprint.id));
        // The other membership is untouched.
        assert!(state.memberships.contains(unfinished.id, next.id));
    }

    #[test]
    fn complete_without_move_keeps_membership_intact() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");
        fx.manager.start_sprint(sprint.id).unwrap();

        let finished = fx.card_in(&fx.done, None);
        let unfinished = fx.card_in(&fx.todo, None);
        fx.manager.add_card_to_sprint(finished.id, sprint.id).unwrap();
        fx.manager
            .add_card_to_sprint(unfinished.id, sprint.id)
            .unwrap();

        let closed = fx.manager.complete_sprint(sprint.id, false).unwrap();
        assert_eq!(closed.status, SprintStatus::Closed);

        let state = fx.state.read();
        assert!(state.memberships.contains(finished.id, sprint.id));
        assert!(state.memberships.contains(unfinished.id, sprint.id));
    }

    #[test]
    fn complete_writes_final_snapshot_from_pre_mutation_state() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");
        fx.manager.start_sprint(sprint.id).unwrap();

        let finished = fx.card_in(&fx.done, Some(3));
        let unfinished = fx.card_in(&fx.todo, Some(5));
        fx.manager.add_card_to_sprint(finished.id, sprint.id).unwrap();
        fx.manager
            .add_card_to_sprint(unfinished.id, sprint.id)
            .unwrap();

        fx.manager.complete_sprint(sprint.id, true).unwrap();

        let state = fx.state.read();
        let snapshot = state.latest_snapshot(sprint.id).unwrap();
        // Counts reflect membership before incomplete cards were detached.
        assert_eq!(snapshot.total_cards, 2);
        assert_eq!(snapshot.completed_cards, 1);
        assert_eq!(snapshot.total_story_points, 8);
        assert_eq!(snapshot.completed_story_points, 3);
    }

    #[test]
    fn complete_twice_fails_without_rerunning_side_effects() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");
        fx.manager.start_sprint(sprint.id).unwrap();

        fx.manager.complete_sprint(sprint.id, true).unwrap();
        let result = fx.manager.complete_sprint(sprint.id, true);

        assert!(matches!(result, Err(CadenceError::InvalidState(_))));
    }

    #[test]
    fn failed_complete_leaves_state_untouched() {
        use crate::provider::MockBoardData;

        let board_id = Uuid::new_v4();
        let state = Arc::new(RwLock::new(EngineState::new()));

        let mut mock = MockBoardData::new();
        mock.expect_card().returning(|_| {
            Ok(Some(Card::new(
                Uuid::new_v4(),
                Uuid::new_v4(),
                "Task".to_string(),
            )))
        });
        mock.expect_cards_by_ids().returning(|_| Ok(vec![]));
        mock.expect_columns_for_board()
            .returning(|_| Err(CadenceError::Internal("column service down".to_string())));

        let manager = SprintLifecycleManager::new(state.clone(), Arc::new(mock));
        let sprint = manager
            .create_sprint(CreateSprintRequest {
                board_id,
                name: "Sprint 1".to_string(),
                goal: None,
                start_date: None,
                end_date: None,
                created_by: Uuid::new_v4(),
            })
            .unwrap();
        manager.start_sprint(sprint.id).unwrap();
        let card_id = Uuid::new_v4();
        manager.add_card_to_sprint(card_id, sprint.id).unwrap();

        let result = manager.complete_sprint(sprint.id, true);
        assert!(matches!(result, Err(CadenceError::Internal(_))));

        // No partial effects: still active, membership intact, no snapshot.
        let state = state.read();
        assert_eq!(
            state.find_sprint(sprint.id).unwrap().status,
            SprintStatus::Active
        );
        assert!(state.memberships.contains(card_id, sprint.id));
        assert!(state.snapshots.is_empty());
    }

    #[test]
    fn complete_requires_active() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");

        let result = fx.manager.complete_sprint(sprint.id, false);
        assert!(matches!(result, Err(CadenceError::InvalidState(_))));
    }

    // --- delete / update ---

    #[test]
    fn delete_only_while_future() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");
        let card = fx.card_in(&fx.todo, None);
        fx.manager.add_card_to_sprint(card.id, sprint.id).unwrap();

        let other = fx.create_sprint("Sprint 2");
        fx.manager.add_card_to_sprint(card.id, other.id).unwrap();

        fx.manager.delete_sprint(sprint.id).unwrap();
        {
            let state = fx.state.read();
            assert!(state.find_sprint(sprint.id).is_none());
            // Cascade is scoped to the deleted sprint.
            assert!(state.memberships.contains(card.id, other.id));
        }

        fx.manager.start_sprint(other.id).unwrap();
        let result = fx.manager.delete_sprint(other.id);
        assert!(matches!(result, Err(CadenceError::InvalidState(_))));
    }

    #[test]
    fn update_rejects_closed_sprint() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");
        fx.manager.start_sprint(sprint.id).unwrap();
        fx.manager.complete_sprint(sprint.id, false).unwrap();

        let result = fx.manager.update_sprint(
            sprint.id,
            SprintUpdate {
                name: Some("Renamed".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(CadenceError::InvalidState(_))));
    }

    // --- membership ---

    #[test]
    fn add_and_remove_are_idempotent() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");
        let card = fx.card_in(&fx.todo, None);

        fx.manager.add_card_to_sprint(card.id, sprint.id).unwrap();
        fx.manager.add_card_to_sprint(card.id, sprint.id).unwrap();
        assert_eq!(fx.state.read().memberships.len(), 1);

        fx.manager
            .remove_card_from_sprint(card.id, sprint.id)
            .unwrap();
        fx.manager
            .remove_card_from_sprint(card.id, sprint.id)
            .unwrap();
        assert!(fx.state.read().memberships.is_empty());
    }

    #[test]
    fn add_requires_existing_card_and_sprint() {
        let fx = fixture();
        let sprint = fx.create_sprint("Sprint 1");
        let card = fx.card_in(&fx.todo, None);

        let missing_card = fx.manager.add_card_to_sprint(Uuid::new_v4(), sprint.id);
        assert!(matches!(missing_card, Err(CadenceError::NotFound(_))));

        let missing_sprint = fx.manager.add_card_to_sprint(card.id, Uuid::new_v4());
        assert!(matches!(missing_sprint, Err(CadenceError::NotFound(_))));
    }

    #[test]
    fn set_card_sprints_roundtrip() {
        let fx = fixture();
        let a = fx.create_sprint("A");
        let b = fx.create_sprint("B");
        let card = fx.card_in(&fx.todo, None);

        fx.manager.set_card_sprints(card.id, &[a.id, b.id]).unwrap();
        fx.manager.set_card_sprints(card.id, &[a.id]).unwrap();

        let state = fx.state.read();
        assert_eq!(state.memberships.sprints_for_card(card.id), vec![a.id]);
        assert!(!state.memberships.contains(card.id, b.id));
    }

    #[test]
    fn backlog_move_clears_all_memberships() {
        let fx = fixture();
        let a = fx.create_sprint("A");
        let b = fx.create_sprint("B");
        let card = fx.card_in(&fx.todo, None);
        let other = fx.card_in(&fx.todo, None);

        fx.manager.set_card_sprints(card.id, &[a.id, b.id]).unwrap();
        fx.manager.add_card_to_sprint(other.id, a.id).unwrap();

        fx.manager.move_card_to_backlog(card.id).unwrap();

        let backlog = fx.manager.get_backlog_cards(fx.board_id).unwrap();
        assert!(backlog.iter().any(|c| c.id == card.id));
        assert!(!backlog.iter().any(|c| c.id == other.id));

        let state = fx.state.read();
        assert!(state.memberships.sprints_for_card(card.id).is_empty());
    }

    // --- closed-sprint pagination ---

    #[test]
    fn closed_sprints_are_paginated_most_recent_first() {
        let fx = fixture();
        let mut closed_ids = Vec::new();
        for i in 0..3 {
            let sprint = fx.create_sprint(&format!("Sprint {}", i));
            fx.manager.start_sprint(sprint.id).unwrap();
            fx.manager.complete_sprint(sprint.id, false).unwrap();
            closed_ids.push(sprint.id);
        }

        let page = fx
            .manager
            .get_closed_sprints(fx.board_id, PageRequest::new(2, 0))
            .unwrap();

        assert_eq!(page.page.total, 3);
        assert!(page.page.has_more);
        assert_eq!(page.items.len(), 2);
        // Most recently closed first
        assert_eq!(page.items[0].id, closed_ids[2]);
        assert_eq!(page.items[1].id, closed_ids[1]);

        let rest = fx
            .manager
            .get_closed_sprints(fx.board_id, PageRequest::new(2, 2))
            .unwrap();
        assert_eq!(rest.items.len(), 1);
        assert_eq!(rest.items[0].id, closed_ids[0]);
        assert!(!rest.page.has_more);
    }
}
