//! notes-core: shared types for the notes service.
//!
//! This crate provides:
//! - The `Note` document and its wire shape
//! - Request payloads for creating and updating notes
//! - Client-side validation rules
//!
//! Both the REST backend and the client depend on this crate so the JSON
//! shape is defined in exactly one place.

pub mod types;
pub mod validation;

pub use types::{NewNote, Note, NoteId, NoteUpdate, has_note_changed};
pub use validation::{MAX_TITLE_LENGTH, ValidationError, validate_note};
