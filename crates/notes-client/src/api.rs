//! Remote data access for the notes REST API.
//!
//! Each operation is a single round trip. Failures of any kind, transport
//! or non-2xx, come back as a rejected [`NoteError`]; no operation ever
//! resolves with a sentinel value. Outcomes are also reported to the
//! configured [`Notifier`].

use std::future::Future;
use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use notes_core::{NewNote, Note, NoteId, NoteUpdate};

use crate::config::ClientConfig;
use crate::error::NoteError;
use crate::notify::{Notifier, TracingNotifier};

/// Fallback message when a failure carries no usable text.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// The five note operations, as seen by the note store.
pub trait NotesRemote: Send + Sync {
    /// All notes, most recently created first.
    fn list_notes(&self) -> impl Future<Output = Result<Vec<Note>, NoteError>> + Send;

    /// One note by id.
    fn get_note(&self, id: &NoteId) -> impl Future<Output = Result<Note, NoteError>> + Send;

    /// Create a note; the server assigns id and timestamps.
    fn create_note(&self, note: &NewNote) -> impl Future<Output = Result<Note, NoteError>> + Send;

    /// Apply a partial update; the server refreshes `updatedAt`.
    fn update_note(
        &self,
        id: &NoteId,
        update: &NoteUpdate,
    ) -> impl Future<Output = Result<Note, NoteError>> + Send;

    /// Delete a note.
    fn delete_note(&self, id: &NoteId) -> impl Future<Output = Result<(), NoteError>> + Send;
}

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP implementation of [`NotesRemote`].
#[derive(Clone)]
pub struct NotesApi {
    client: Client,
    notes_url: String,
    notifier: Arc<dyn Notifier>,
}

impl NotesApi {
    /// Build a client for the server at `config.base_url`.
    pub fn new(config: ClientConfig) -> Result<Self, NoteError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| NoteError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            notes_url: format!("{}/api/notes", config.base_url.trim_end_matches('/')),
            notifier: Arc::new(TracingNotifier),
        })
    }

    /// Replace the notification sink.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Collection URL, e.g. `http://localhost:5000/api/notes`.
    pub fn notes_url(&self) -> &str {
        &self.notes_url
    }

    fn note_url(&self, id: &NoteId) -> String {
        format!("{}/{}", self.notes_url, id)
    }

    /// Send a request, decode a 2xx body, or translate the failure.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, NoteError> {
        let result = match request.send().await {
            Ok(response) => decode(response).await,
            Err(e) => Err(NoteError::Transport(transport_message(&e))),
        };

        if let Err(err) = &result {
            tracing::debug!(kind = ?err.kind(), error = %err, "Notes API call failed");
            self.notifier.error(&err.message());
        }
        result
    }
}

impl std::fmt::Debug for NotesApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotesApi")
            .field("notes_url", &self.notes_url)
            .finish_non_exhaustive()
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, NoteError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| NoteError::Transport(transport_message(&e)));
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_for_status(status, &body))
}

/// Translate a non-2xx response into the error taxonomy, preferring the
/// server's `message` field.
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> NoteError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));

    match status {
        StatusCode::NOT_FOUND => NoteError::NotFound(message),
        StatusCode::CONFLICT => NoteError::DuplicateTitle(message),
        _ => NoteError::Transport(message),
    }
}

fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request timed out".to_string()
    } else if err.is_connect() {
        "Network Error".to_string()
    } else if err.is_decode() {
        UNEXPECTED_ERROR.to_string()
    } else {
        err.to_string()
    }
}

impl NotesRemote for NotesApi {
    async fn list_notes(&self) -> Result<Vec<Note>, NoteError> {
        self.send(self.client.get(&self.notes_url)).await
    }

    async fn get_note(&self, id: &NoteId) -> Result<Note, NoteError> {
        self.send(self.client.get(self.note_url(id))).await
    }

    async fn create_note(&self, note: &NewNote) -> Result<Note, NoteError> {
        let created: Note = self
            .send(self.client.post(&self.notes_url).json(note))
            .await?;
        tracing::info!(note_id = %created.id, "Note created");
        self.notifier.success("Note created successfully");
        Ok(created)
    }

    async fn update_note(&self, id: &NoteId, update: &NoteUpdate) -> Result<Note, NoteError> {
        let updated: Note = self
            .send(self.client.put(self.note_url(id)).json(update))
            .await?;
        tracing::info!(note_id = %updated.id, "Note updated");
        self.notifier.success("Note updated successfully");
        Ok(updated)
    }

    async fn delete_note(&self, id: &NoteId) -> Result<(), NoteError> {
        let _confirmation: serde_json::Value =
            self.send(self.client.delete(self.note_url(id))).await?;
        tracing::info!(note_id = %id, "Note deleted");
        self.notifier.success("Note deleted successfully");
        Ok(())
    }
}
