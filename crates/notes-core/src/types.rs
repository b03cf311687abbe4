//! Core data types for notes.
//!
//! A note is a titled text record. Its identifier and both timestamps are
//! assigned by the server; clients only ever supply a title and a body.
//!
//! The serialized form matches the REST surface:
//!
//! ```json
//! {"_id": "...", "title": "...", "body": "...",
//!  "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-01T00:00:00Z"}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Opaque identifier for a note.
///
/// Assigned by the server when the note is created and never changed
/// afterwards. Clients must treat the contents as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generates a fresh random id for a newly stored note.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Note
// ============================================================================

/// A stored note as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Server-assigned identifier.
    #[serde(rename = "_id")]
    pub id: NoteId,
    /// Title, unique across the collection.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful update.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Returns a copy of this note with `update` applied and `updated_at`
    /// set to the given timestamp.
    ///
    /// Used for the provisional entry of an optimistic edit; the server's
    /// response replaces it once the update is confirmed.
    #[must_use]
    pub fn merged(&self, update: &NoteUpdate, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: self.id.clone(),
            title: update.title.clone().unwrap_or_else(|| self.title.clone()),
            body: update.body.clone().unwrap_or_else(|| self.body.clone()),
            created_at: self.created_at,
            updated_at,
        }
    }
}

/// Payload for creating a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub body: String,
}

impl NewNote {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Partial update for an existing note. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl NoteUpdate {
    /// Update that only changes the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: None,
        }
    }

    /// Update that only changes the body.
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            title: None,
            body: Some(body.into()),
        }
    }

    /// Update that replaces both fields.
    pub fn both(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    /// Returns true if no field is present.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none()
    }

    /// Returns true if applying this update to `note` would change nothing.
    pub fn is_noop_for(&self, note: &Note) -> bool {
        let title_same = self.title.as_ref().is_none_or(|t| *t == note.title);
        let body_same = self.body.as_ref().is_none_or(|b| *b == note.body);
        title_same && body_same
    }
}

/// Returns true if the title or body of two notes differ.
pub fn has_note_changed(a: &Note, b: &Note) -> bool {
    a.title != b.title || a.body != b.body
}

// ============================================================================
// Tests
// ============================================================================
