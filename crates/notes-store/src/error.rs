//! Error types for the storage layer.

use notes_core::NoteId;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Connection(sqlx::Error),

    /// No note with this id.
    #[error("note not found: {0}")]
    NoteNotFound(NoteId),

    /// Another note already uses this title.
    #[error("duplicate title: {0}")]
    DuplicateTitle(String),

    /// Migration error.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl StoreError {
    /// Classify a write failure, turning unique-constraint violations into
    /// [`StoreError::DuplicateTitle`].
    pub(crate) fn from_write(err: sqlx::Error, title: Option<&str>) -> Self {
        if let sqlx::Error::Database(db) = &err
            && db.is_unique_violation()
        {
            return Self::DuplicateTitle(title.unwrap_or_default().to_string());
        }
        Self::Connection(err)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Connection(err)
    }
}
