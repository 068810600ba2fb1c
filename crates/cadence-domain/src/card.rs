use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::column::{BoardId, ColumnId};

pub type CardId = Uuid;

/// Read-side view of a work item, as served by the card service.
///
/// Only the fields the sprint engine reads are carried: the board and
/// column the card currently sits in, and its story-point estimate.
/// Sprint membership is not a card field; it lives in the membership table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub board_id: BoardId,
    pub column_id: ColumnId,
    pub title: String,
    pub points: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(board_id: BoardId, column_id: ColumnId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            board_id,
            column_id,
            title,
            points: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = Some(points);
        self
    }

    pub fn move_to_column(&mut self, column_id: ColumnId) {
        self.column_id = column_id;
        self.updated_at = Utc::now();
    }
}
