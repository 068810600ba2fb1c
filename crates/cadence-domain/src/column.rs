use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type BoardId = Uuid;
pub type ColumnId = Uuid;

/// Read-side view of a board column, as served by the board/column service.
///
/// The engine never mutates columns; it only reads the `is_done` completion
/// flag to decide whether a card sitting in the column counts as finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub name: String,
    pub position: i32,
    #[serde(default)]
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Column {
    pub fn new(board_id: BoardId, name: String, position: i32, is_done: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            name,
            position,
            is_done,
            created_at: now,
            updated_at: now,
        }
    }
}
