//! Tag store error types.

use thiserror::Error;

/// Tag store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Config(e.to_string())
    }
}

/// Result type for tag store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
