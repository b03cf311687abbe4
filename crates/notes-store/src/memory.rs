//! In-memory note collection.
//!
//! Used when no database is configured and by tests. Applies the same rules
//! as the PostgreSQL backend: titles are unique, listing is newest first,
//! updates refresh `updated_at`.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use notes_core::{NewNote, Note, NoteId, NoteUpdate};

use crate::error::{StoreError, StoreResult};

/// Thread-safe in-memory note collection.
#[derive(Debug, Default)]
pub struct MemoryNotes {
    notes: RwLock<Vec<Note>>,
}

impl MemoryNotes {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Note>> {
        self.notes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Note>> {
        self.notes.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// All notes, most recently created first.
    pub fn list(&self) -> Vec<Note> {
        let mut notes = self.read().clone();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notes
    }

    pub fn get(&self, id: &NoteId) -> StoreResult<Note> {
        self.read()
            .iter()
            .find(|n| n.id == *id)
            .cloned()
            .ok_or_else(|| StoreError::NoteNotFound(id.clone()))
    }

    pub fn insert(&self, new: &NewNote) -> StoreResult<Note> {
        let mut notes = self.write();
        if notes.iter().any(|n| n.title == new.title) {
            return Err(StoreError::DuplicateTitle(new.title.clone()));
        }

        let now = Utc::now();
        let note = Note {
            id: NoteId::generate(),
            title: new.title.clone(),
            body: new.body.clone(),
            created_at: now,
            updated_at: now,
        };
        notes.push(note.clone());
        Ok(note)
    }

    pub fn update(&self, id: &NoteId, update: &NoteUpdate) -> StoreResult<Note> {
        let mut notes = self.write();
        let index = notes
            .iter()
            .position(|n| n.id == *id)
            .ok_or_else(|| StoreError::NoteNotFound(id.clone()))?;

        if let Some(title) = &update.title
            && notes.iter().any(|n| n.id != *id && n.title == *title)
        {
            return Err(StoreError::DuplicateTitle(title.clone()));
        }

        let updated = notes[index].merged(update, Utc::now());
        notes[index] = updated.clone();
        Ok(updated)
    }

    /// Remove a note. Returns false if it did not exist.
    pub fn delete(&self, id: &NoteId) -> bool {
        let mut notes = self.write();
        let before = notes.len();
        notes.retain(|n| n.id != *id);
        notes.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_assigns_id_and_timestamps() {
        let notes = MemoryNotes::new();
        let note = notes.insert(&NewNote::new("A", "B")).unwrap();
        assert!(!note.id.as_str().is_empty());
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(notes.get(&note.id).unwrap(), note);
    }

    #[test]
    fn duplicate_titles_are_rejected() {
        let notes = MemoryNotes::new();
        notes.insert(&NewNote::new("A", "1")).unwrap();
        let err = notes.insert(&NewNote::new("A", "2")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTitle(t) if t == "A"));
    }

    #[test]
    fn update_to_own_title_is_allowed() {
        let notes = MemoryNotes::new();
        let note = notes.insert(&NewNote::new("A", "1")).unwrap();
        let updated = notes.update(&note.id, &NoteUpdate::both("A", "2")).unwrap();
        assert_eq!(updated.body, "2");
        assert!(updated.updated_at >= note.updated_at);
    }

    #[test]
    fn update_to_other_title_is_rejected() {
        let notes = MemoryNotes::new();
        let a = notes.insert(&NewNote::new("A", "1")).unwrap();
        notes.insert(&NewNote::new("B", "2")).unwrap();
        let err = notes.update(&a.id, &NoteUpdate::title("B")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTitle(_)));
        assert_eq!(notes.get(&a.id).unwrap().title, "A");
    }

    #[test]
    fn update_unknown_id() {
        let notes = MemoryNotes::new();
        let err = notes
            .update(&NoteId::from("missing"), &NoteUpdate::body("x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NoteNotFound(_)));
    }

    #[test]
    fn delete_reports_presence() {
        let notes = MemoryNotes::new();
        let note = notes.insert(&NewNote::new("A", "1")).unwrap();
        assert!(notes.delete(&note.id));
        assert!(!notes.delete(&note.id));
        assert!(notes.list().is_empty());
    }
}
