//! Error types for boardkit-engine

use boardkit_core::BoardError;
use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// True when the caller's input caused the failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Board(e) if e.is_validation())
    }

    /// True for update/lookup against an unknown id
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Board(BoardError::NotFound { .. }))
    }
}
