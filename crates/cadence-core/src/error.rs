use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CadenceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Board {board_id} already has active sprint {active_sprint_id}")]
    AlreadyActive {
        board_id: Uuid,
        active_sprint_id: Uuid,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CadenceError {
    pub fn not_found(entity: &str, id: Uuid) -> Self {
        Self::NotFound(format!("{} {}", entity, id))
    }
}
