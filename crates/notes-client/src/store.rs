//! Client-side note cache.
//!
//! [`NoteStore`] mirrors the server's note collection and routes every
//! mutation through a [`NotesRemote`]. The cache changes only after the
//! remote call settles, with one exception: [`NoteStore::edit`] writes a
//! provisional entry first and either replaces it with the server's answer
//! or restores the last server-confirmed entry on failure.
//!
//! The store does not serialize callers. Concurrent edits of the same note
//! are last-writer-wins at the cache level; the server orders the writes.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use notes_core::{NewNote, Note, NoteId, NoteUpdate};

use crate::api::NotesRemote;
use crate::error::NoteError;

#[derive(Debug, Default)]
struct StoreState {
    notes: Vec<Note>,
    /// Last copy of each note the server returned. Never provisional.
    confirmed: HashMap<NoteId, Note>,
    in_flight: usize,
    error: Option<String>,
}

impl StoreState {
    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|n| n.id == *id)
    }

    fn confirm(&mut self, note: &Note) {
        self.confirmed.insert(note.id.clone(), note.clone());
    }
}

/// Cache of the note collection backed by a remote.
#[derive(Debug)]
pub struct NoteStore<R> {
    remote: R,
    state: Mutex<StoreState>,
}

/// Marks the store busy for as long as it is alive.
struct Busy<'a> {
    state: &'a Mutex<StoreState>,
}

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

impl<R: NotesRemote> NoteStore<R> {
    /// Create an empty store. Call [`load`](Self::load) to populate it.
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// The remote this store talks to.
    pub fn remote(&self) -> &R {
        &self.remote
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn busy(&self) -> Busy<'_> {
        self.lock().in_flight += 1;
        Busy { state: &self.state }
    }

    /// Snapshot of the cached notes.
    pub fn notes(&self) -> Vec<Note> {
        self.lock().notes.clone()
    }

    /// Cached note by id.
    pub fn find(&self, id: &NoteId) -> Option<Note> {
        let state = self.lock();
        state.position(id).map(|i| state.notes[i].clone())
    }

    /// Whether any remote call is in flight.
    pub fn is_busy(&self) -> bool {
        self.lock().in_flight > 0
    }

    /// Message from the last failed [`load`](Self::load), if any.
    pub fn last_error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Replace the cache with the server's full list.
    ///
    /// On failure the cache is left as it was and the message is kept in
    /// [`last_error`](Self::last_error).
    pub async fn load(&self) {
        let _busy = self.busy();
        match self.remote.list_notes().await {
            Ok(notes) => {
                tracing::debug!(count = notes.len(), "Note cache reloaded");
                let mut state = self.lock();
                state.confirmed = notes.iter().map(|n| (n.id.clone(), n.clone())).collect();
                state.notes = notes;
                state.error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load notes");
                self.lock().error = Some(err.message());
            }
        }
    }

    /// Create a note and append the server's copy to the cache.
    ///
    /// Validation is the caller's job; see [`notes_core::validate_note`].
    pub async fn add(&self, note: NewNote) -> Result<Note, NoteError> {
        let _busy = self.busy();
        let created = self.remote.create_note(&note).await?;
        let mut state = self.lock();
        state.confirm(&created);
        state.notes.push(created.clone());
        Ok(created)
    }

    /// Update a cached note.
    ///
    /// Fails with [`NoteError::NotFound`] if the note is not cached and with
    /// [`NoteError::DuplicateTitle`] if another cached note already has the
    /// new title; neither case touches the network. An update that changes
    /// nothing returns the cached note without a remote call.
    ///
    /// Otherwise the merged note is written to the cache before the remote
    /// call. Success replaces it with the server's note. Failure puts back
    /// the last copy the server returned, but only while the cache still
    /// holds this call's provisional entry; a later edit's entry is left for
    /// that edit to settle.
    pub async fn edit(&self, id: &NoteId, update: NoteUpdate) -> Result<Note, NoteError> {
        let provisional = {
            let mut state = self.lock();
            let Some(index) = state.position(id) else {
                return Err(NoteError::NotFound(format!("Note {} not found", id)));
            };
            let current = state.notes[index].clone();

            if let Some(title) = &update.title
                && *title != current.title
                && state.notes.iter().any(|n| n.id != *id && n.title == *title)
            {
                return Err(NoteError::DuplicateTitle(format!(
                    "A note titled \"{}\" already exists",
                    title
                )));
            }

            if update.is_noop_for(&current) {
                return Ok(current);
            }

            let provisional = current.merged(&update, Utc::now());
            state.notes[index] = provisional.clone();
            provisional
        };

        let _busy = self.busy();
        match self.remote.update_note(id, &update).await {
            Ok(updated) => {
                let mut state = self.lock();
                state.confirm(&updated);
                if let Some(index) = state.position(id) {
                    state.notes[index] = updated.clone();
                }
                Ok(updated)
            }
            Err(err) => {
                let mut state = self.lock();
                if let Some(index) = state.position(id)
                    && state.notes[index] == provisional
                    && let Some(confirmed) = state.confirmed.get(id).cloned()
                {
                    state.notes[index] = confirmed;
                }
                Err(err)
            }
        }
    }

    /// Delete a note, dropping it from the cache only once the server
    /// confirms.
    pub async fn remove(&self, id: &NoteId) -> Result<(), NoteError> {
        let _busy = self.busy();
        self.remote.delete_note(id).await?;
        let mut state = self.lock();
        state.notes.retain(|n| n.id != *id);
        state.confirmed.remove(id);
        Ok(())
    }

    /// Fetch one note straight from the server. The cache is not touched.
    pub async fn get_one(&self, id: &NoteId) -> Result<Note, NoteError> {
        let _busy = self.busy();
        self.remote.get_note(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone};
    use std::future::Future;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap()
    }

    fn note(id: &str, title: &str, body: &str) -> Note {
        Note {
            id: NoteId::from(id),
            title: title.to_string(),
            body: body.to_string(),
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    /// In-process remote with a call counter and switchable failure.
    #[derive(Default)]
    struct FakeRemote {
        notes: Mutex<Vec<Note>>,
        calls: AtomicUsize,
        fail_with: Mutex<Option<NoteError>>,
        /// When set, `update_note` waits for a notification before answering.
        gate: Option<Arc<Notify>>,
    }

    impl FakeRemote {
        fn with_notes(notes: Vec<Note>) -> Self {
            Self {
                notes: Mutex::new(notes),
                ..Self::default()
            }
        }

        fn fail(&self, err: NoteError) {
            *self.fail_with.lock().unwrap() = Some(err);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn begin(&self) -> Result<(), NoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.fail_with.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    impl NotesRemote for FakeRemote {
        fn list_notes(&self) -> impl Future<Output = Result<Vec<Note>, NoteError>> + Send {
            let result = self.begin().map(|_| self.notes.lock().unwrap().clone());
            async move { result }
        }

        fn get_note(&self, id: &NoteId) -> impl Future<Output = Result<Note, NoteError>> + Send {
            let result = self.begin().and_then(|_| {
                self.notes
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|n| n.id == *id)
                    .cloned()
                    .ok_or_else(|| NoteError::NotFound("Note not found".to_string()))
            });
            async move { result }
        }

        fn create_note(&self, new: &NewNote) -> impl Future<Output = Result<Note, NoteError>> + Send {
            let result = self.begin().map(|_| {
                let created = Note {
                    id: NoteId::from("1"),
                    title: new.title.clone(),
                    body: new.body.clone(),
                    created_at: ts(5),
                    updated_at: ts(5),
                };
                self.notes.lock().unwrap().push(created.clone());
                created
            });
            async move { result }
        }

        fn update_note(
            &self,
            id: &NoteId,
            update: &NoteUpdate,
        ) -> impl Future<Output = Result<Note, NoteError>> + Send {
            let gate = self.gate.clone();
            let id = id.clone();
            let update = update.clone();
            async move {
                if let Some(gate) = gate {
                    gate.notified().await;
                }
                self.begin()?;
                let mut notes = self.notes.lock().unwrap();
                let existing = notes
                    .iter_mut()
                    .find(|n| n.id == id)
                    .ok_or_else(|| NoteError::NotFound("Note not found".to_string()))?;
                *existing = existing.merged(&update, ts(30));
                Ok(existing.clone())
            }
        }

        fn delete_note(&self, id: &NoteId) -> impl Future<Output = Result<(), NoteError>> + Send {
            let result = self.begin().map(|_| {
                self.notes.lock().unwrap().retain(|n| n.id != *id);
            });
            async move { result }
        }
    }

    async fn loaded(notes: Vec<Note>) -> NoteStore<FakeRemote> {
        let store = NoteStore::new(FakeRemote::with_notes(notes));
        store.load().await;
        store
    }

    #[tokio::test]
    async fn load_replaces_cache() {
        let store = loaded(vec![note("1", "A", "a"), note("2", "B", "b")]).await;
        assert_eq!(store.notes().len(), 2);
        assert!(store.last_error().is_none());
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn failed_load_keeps_cache_and_records_error() {
        let store = loaded(vec![note("1", "A", "a")]).await;
        store.remote().fail(NoteError::Transport("Network Error".to_string()));

        store.load().await;
        assert_eq!(store.notes(), vec![note("1", "A", "a")]);
        assert_eq!(store.last_error().as_deref(), Some("Network Error"));

        *store.remote().fail_with.lock().unwrap() = None;
        store.load().await;
        assert!(store.last_error().is_none());
    }

    #[tokio::test]
    async fn add_appends_server_copy_once() {
        let store = loaded(vec![]).await;
        let created = store.add(NewNote::new("A", "B")).await.unwrap();

        assert_eq!(created.id.as_str(), "1");
        assert_eq!(created.created_at, ts(5));
        assert_eq!(store.notes(), vec![created]);
    }

    #[tokio::test]
    async fn failed_add_leaves_cache() {
        let store = loaded(vec![note("9", "Z", "z")]).await;
        store
            .remote()
            .fail(NoteError::DuplicateTitle("A note with this title already exists!".to_string()));

        let err = store.add(NewNote::new("Z", "again")).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DuplicateTitle);
        assert_eq!(store.notes(), vec![note("9", "Z", "z")]);
    }

    #[tokio::test]
    async fn identical_edit_skips_network() {
        let store = loaded(vec![note("1", "A", "a")]).await;
        let calls = store.remote().calls();

        let result = store
            .edit(&NoteId::from("1"), NoteUpdate::both("A", "a"))
            .await
            .unwrap();
        assert_eq!(result, note("1", "A", "a"));
        assert_eq!(store.remote().calls(), calls);
    }

    #[tokio::test]
    async fn edit_to_taken_title_fails_locally() {
        let store = loaded(vec![note("1", "A", "a"), note("2", "B", "b")]).await;
        let calls = store.remote().calls();

        let err = store
            .edit(&NoteId::from("1"), NoteUpdate::title("B"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::DuplicateTitle);
        assert_eq!(store.remote().calls(), calls);
        assert_eq!(store.find(&NoteId::from("1")).unwrap().title, "A");
    }

    #[tokio::test]
    async fn edit_unknown_note_is_not_found() {
        let store = loaded(vec![]).await;
        let err = store
            .edit(&NoteId::from("nope"), NoteUpdate::body("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
        assert_eq!(store.remote().calls(), 1);
    }

    #[tokio::test]
    async fn edit_replaces_entry_with_server_response() {
        let store = loaded(vec![note("1", "A", "a"), note("2", "B", "b")]).await;

        let updated = store
            .edit(&NoteId::from("1"), NoteUpdate::body("new"))
            .await
            .unwrap();
        assert_eq!(updated.body, "new");
        assert_eq!(updated.updated_at, ts(30));

        let notes = store.notes();
        assert_eq!(notes[0], updated);
        assert_eq!(notes[1], note("2", "B", "b"));
    }

    #[tokio::test]
    async fn failed_edit_restores_previous_entry() {
        let store = loaded(vec![note("1", "A", "a")]).await;
        store.remote().fail(NoteError::Transport("boom".to_string()));

        let err = store
            .edit(&NoteId::from("1"), NoteUpdate::both("A2", "changed"))
            .await
            .unwrap_err();
        assert_eq!(err, NoteError::Transport("boom".to_string()));
        assert_eq!(store.notes(), vec![note("1", "A", "a")]);
    }

    #[tokio::test]
    async fn optimistic_entry_visible_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let remote = FakeRemote {
            gate: Some(Arc::clone(&gate)),
            ..FakeRemote::with_notes(vec![note("1", "A", "a")])
        };
        let store = Arc::new(NoteStore::new(remote));
        store.load().await;

        let task = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.edit(&NoteId::from("1"), NoteUpdate::body("draft")).await }
        });

        // Let the edit reach the remote call.
        while !store.is_busy() {
            tokio::task::yield_now().await;
        }
        let provisional = store.find(&NoteId::from("1")).unwrap();
        assert_eq!(provisional.body, "draft");
        assert_ne!(provisional.updated_at, ts(30));

        gate.notify_one();
        let updated = task.await.unwrap().unwrap();
        assert_eq!(store.find(&NoteId::from("1")).unwrap(), updated);
        assert_eq!(updated.updated_at, ts(30));
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn overlapping_failed_edits_restore_server_copy() {
        let gate = Arc::new(Notify::new());
        let remote = FakeRemote {
            gate: Some(Arc::clone(&gate)),
            ..FakeRemote::with_notes(vec![note("1", "A", "a")])
        };
        let store = Arc::new(NoteStore::new(remote));
        store.load().await;
        store.remote().fail(NoteError::Transport("Network Error".to_string()));

        let spawn_edit = |body: &'static str| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.edit(&NoteId::from("1"), NoteUpdate::body(body)).await })
        };
        let first = spawn_edit("x");
        while store.lock().in_flight < 1 {
            tokio::task::yield_now().await;
        }
        let second = spawn_edit("y");
        while store.lock().in_flight < 2 {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.find(&NoteId::from("1")).unwrap().body, "y");

        gate.notify_one();
        tokio::task::yield_now().await;
        gate.notify_one();

        assert!(first.await.unwrap().is_err());
        assert!(second.await.unwrap().is_err());
        assert_eq!(store.notes(), vec![note("1", "A", "a")]);
        assert!(!store.is_busy());
    }

    #[tokio::test]
    async fn failed_edit_after_success_keeps_server_copy() {
        let store = loaded(vec![note("1", "A", "a")]).await;
        let saved = store
            .edit(&NoteId::from("1"), NoteUpdate::body("saved"))
            .await
            .unwrap();

        store.remote().fail(NoteError::Transport("boom".to_string()));
        store
            .edit(&NoteId::from("1"), NoteUpdate::body("lost"))
            .await
            .unwrap_err();
        assert_eq!(store.notes(), vec![saved]);
    }

    #[tokio::test]
    async fn failed_remove_keeps_entry() {
        let store = loaded(vec![note("1", "A", "a")]).await;
        store.remote().fail(NoteError::Transport("Network Error".to_string()));

        let err = store.remove(&NoteId::from("1")).await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Transport);
        assert_eq!(store.notes(), vec![note("1", "A", "a")]);
    }

    #[tokio::test]
    async fn remove_drops_entry() {
        let store = loaded(vec![note("1", "A", "a"), note("2", "B", "b")]).await;
        store.remove(&NoteId::from("1")).await.unwrap();
        assert_eq!(store.notes(), vec![note("2", "B", "b")]);
    }

    #[tokio::test]
    async fn get_one_bypasses_cache() {
        let store = loaded(vec![]).await;
        store
            .remote()
            .notes
            .lock()
            .unwrap()
            .push(note("7", "Server only", "x"));

        let fetched = store.get_one(&NoteId::from("7")).await.unwrap();
        assert_eq!(fetched.title, "Server only");
        assert!(store.notes().is_empty());
    }
}
