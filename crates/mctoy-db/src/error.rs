//! Error types for database operations.

use mctoy_core::PlaceId;
use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Native DB error.
    #[error("Database error: {0}")]
    Database(String),

    /// Place not found.
    #[error("Location not found: {0}")]
    NotFound(PlaceId),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking store task panicked or was cancelled.
    #[error("Store task failed: {0}")]
    Task(String),
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}

impl From<Error> for mctoy_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(id) => mctoy_core::Error::NotFound(id),
            other => mctoy_core::Error::Store(other.to_string()),
        }
    }
}
