//! Database models for the storage layer.
//!
//! These types map directly to database rows. They are converted to the
//! `Note` type from notes-core before leaving the crate.

use chrono::{DateTime, Utc};
use notes_core::{Note, NoteId};
use sqlx::FromRow;

/// Database row for the `notes` table.
#[derive(Debug, Clone, FromRow)]
pub struct NoteRow {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<NoteRow> for Note {
    fn from(row: NoteRow) -> Self {
        Self {
            id: NoteId::from(row.id),
            title: row.title,
            body: row.body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
