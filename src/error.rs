//! Error types for timer operations and persistence

use thiserror::Error;

/// Errors surfaced by [`TimerController`](crate::state::TimerController) operations
#[derive(Debug, Error)]
pub enum TimerError {
    /// The duration input was rejected; the user must correct and resubmit
    #[error("{0}")]
    Validation(String),

    /// The operation is not allowed in the current timer state
    #[error("{0}")]
    Precondition(String),
}

/// Errors raised by key-value store backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt entry for key '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

pub type TimerResult<T> = Result<T, TimerError>;
