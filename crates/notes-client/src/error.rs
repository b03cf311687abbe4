//! Error taxonomy for client operations.

use notes_core::ValidationError;
use thiserror::Error;

/// Errors surfaced by the client layer.
///
/// Each variant carries the human-readable message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    /// Rejected before reaching the network.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Title already used, detected locally or reported by the server (409).
    #[error("{0}")]
    DuplicateTitle(String),

    /// No such note in the cache, or the server answered 404.
    #[error("{0}")]
    NotFound(String),

    /// Network failure or any other non-2xx response.
    #[error("{0}")]
    Transport(String),

    /// Auto-save failed; the value is edited locally but unsaved.
    #[error("{0}")]
    NotPersisted(String),
}

/// Discriminant of [`NoteError`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    DuplicateTitle,
    NotFound,
    Transport,
    NotPersisted,
}

impl NoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::DuplicateTitle(_) => ErrorKind::DuplicateTitle,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Transport(_) => ErrorKind::Transport,
            Self::NotPersisted(_) => ErrorKind::NotPersisted,
        }
    }

    /// The user-facing message.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
