//! Read access to board, column, and card data owned by external services.
//!
//! The engine never writes through this seam; it only needs each card's
//! current column and story points, and each column's completion flag.

use cadence_core::CadenceResult;
use cadence_domain::{BoardId, Card, CardId, Column, ColumnId};
use parking_lot::RwLock;

/// Read-side view of the board/column and card services.
#[cfg_attr(test, mockall::automock)]
pub trait BoardData: Send + Sync {
    /// Columns of a board, including their `is_done` completion flags.
    fn columns_for_board(&self, board_id: BoardId) -> CadenceResult<Vec<Column>>;

    /// All cards currently on a board.
    fn cards_for_board(&self, board_id: BoardId) -> CadenceResult<Vec<Card>>;

    /// Look up one card.
    fn card(&self, card_id: CardId) -> CadenceResult<Option<Card>>;

    /// Resolve a batch of card ids. Ids that no longer resolve are
    /// silently skipped; membership rows can outlive their cards.
    fn cards_by_ids(&self, card_ids: &[CardId]) -> CadenceResult<Vec<Card>>;
}

#[derive(Default)]
struct BoardDataInner {
    columns: Vec<Column>,
    cards: Vec<Card>,
}

/// In-memory `BoardData` implementation.
///
/// Serves as the test fixture and as the adapter for embedders that keep a
/// local replica of board state (the common case for a single-process
/// deployment).
#[derive(Default)]
pub struct InMemoryBoardData {
    inner: RwLock<BoardDataInner>,
}

impl InMemoryBoardData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_column(&self, column: Column) {
        self.inner.write().columns.push(column);
    }

    pub fn insert_card(&self, card: Card) {
        self.inner.write().cards.push(card);
    }

    /// Move a card to another column. Returns false if the card is unknown.
    pub fn move_card(&self, card_id: CardId, column_id: ColumnId) -> bool {
        let mut inner = self.inner.write();
        match inner.cards.iter_mut().find(|c| c.id == card_id) {
            Some(card) => {
                card.move_to_column(column_id);
                true
            }
            None => false,
        }
    }

    /// Update a card's story-point estimate. Returns false if unknown.
    pub fn set_points(&self, card_id: CardId, points: Option<u32>) -> bool {
        let mut inner = self.inner.write();
        match inner.cards.iter_mut().find(|c| c.id == card_id) {
            Some(card) => {
                card.points = points;
                true
            }
            None => false,
        }
    }

    pub fn remove_card(&self, card_id: CardId) -> bool {
        let mut inner = self.inner.write();
        let before = inner.cards.len();
        inner.cards.retain(|c| c.id != card_id);
        inner.cards.len() != before
    }
}

impl BoardData for InMemoryBoardData {
    fn columns_for_board(&self, board_id: BoardId) -> CadenceResult<Vec<Column>> {
        Ok(self
            .inner
            .read()
            .columns
            .iter()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect())
    }

    fn cards_for_board(&self, board_id: BoardId) -> CadenceResult<Vec<Card>> {
        Ok(self
            .inner
            .read()
            .cards
            .iter()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect())
    }

    fn card(&self, card_id: CardId) -> CadenceResult<Option<Card>> {
        Ok(self
            .inner
            .read()
            .cards
            .iter()
            .find(|c| c.id == card_id)
            .cloned())
    }

    fn cards_by_ids(&self, card_ids: &[CardId]) -> CadenceResult<Vec<Card>> {
        let inner = self.inner.read();
        Ok(card_ids
            .iter()
            .filter_map(|id| inner.cards.iter().find(|c| c.id == *id).cloned())
            .collect())
    }
}
