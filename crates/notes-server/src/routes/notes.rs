//! Note CRUD routes.
//!
//! This module implements the note endpoints:
//! - GET /api/notes - List all notes, newest first
//! - GET /api/notes/{id} - Fetch one note
//! - POST /api/notes - Create a note
//! - PUT /api/notes/{id} - Update title and/or body
//! - DELETE /api/notes/{id} - Delete a note

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};

use notes_core::{MAX_TITLE_LENGTH, NewNote, Note, NoteId, NoteUpdate, ValidationError};
use notes_store::StoreError;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST /api/notes.
///
/// Both fields are optional at the type level so a missing field produces
/// our own 400 message rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Response for DELETE /api/notes/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteNoteResponse {
    /// Confirmation message.
    pub message: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn validation_message(err: ValidationError) -> String {
    match err {
        ValidationError::TitleRequired => "Title cannot be empty".to_string(),
        ValidationError::BodyRequired => "Body cannot be empty".to_string(),
        ValidationError::TitleTooLong => {
            format!("Title must be at most {} characters", MAX_TITLE_LENGTH)
        }
    }
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /api/notes - List all notes, most recently created first.
async fn list_notes(State(state): State<AppState>) -> ApiResult<Json<Vec<Note>>> {
    let notes = state.store().list_notes().await?;

    tracing::info!(count = notes.len(), "Listed notes");

    Ok(Json(notes))
}

/// GET /api/notes/{id} - Fetch one note.
///
/// # Response
///
/// - 200 OK: the note
/// - 404 Not Found: no note with this id
async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Note>> {
    let note = state.store().get_note(&NoteId::from(id)).await?;
    Ok(Json(note))
}

/// POST /api/notes - Create a note.
///
/// # Request
///
/// Body: `{ "title": "...", "body": "..." }`
///
/// # Response
///
/// - 201 Created: the stored note
/// - 400 Bad Request: missing fields or title too long
/// - 409 Conflict: title already used
async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Note>)> {
    let Json(request) = payload.map_err(bad_json)?;

    let (Some(title), Some(body)) = (request.title, request.body) else {
        return Err(ApiError::BadRequest("Title and body are required!".to_string()));
    };

    match notes_core::validate_note(&title, &body) {
        Ok(()) => {}
        Err(ValidationError::TitleRequired | ValidationError::BodyRequired) => {
            return Err(ApiError::BadRequest("Title and body are required!".to_string()));
        }
        Err(err) => return Err(ApiError::BadRequest(validation_message(err))),
    }

    let note = state
        .store()
        .insert_note(&NewNote { title, body })
        .await
        .map_err(|e| match e {
            StoreError::DuplicateTitle(_) => {
                ApiError::Conflict("A note with this title already exists!".to_string())
            }
            other => ApiError::Store(other),
        })?;

    tracing::info!(note_id = %note.id, title = %note.title, "Note created");

    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/notes/{id} - Update a note.
///
/// # Request
///
/// Body: `{ "title"?: "...", "body"?: "..." }`. Absent fields are unchanged;
/// `updatedAt` is always refreshed.
///
/// # Response
///
/// - 200 OK: the updated note
/// - 400 Bad Request: a present field is blank, or the title is too long
/// - 404 Not Found: no note with this id
/// - 409 Conflict: title already used by another note
async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NoteUpdate>, JsonRejection>,
) -> ApiResult<Json<Note>> {
    let Json(update) = payload.map_err(bad_json)?;

    update
        .validate()
        .map_err(|e| ApiError::BadRequest(validation_message(e)))?;

    let note = state
        .store()
        .update_note(&NoteId::from(id), &update)
        .await
        .map_err(|e| match e {
            StoreError::DuplicateTitle(_) => ApiError::Conflict("Title already exists!".to_string()),
            other => ApiError::Store(other),
        })?;

    tracing::info!(note_id = %note.id, "Note updated");

    Ok(Json(note))
}

/// DELETE /api/notes/{id} - Delete a note.
///
/// Deleting an id that does not exist still answers 200.
async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteNoteResponse>> {
    let id = NoteId::from(id);
    let existed = state.store().delete_note(&id).await?;

    tracing::info!(note_id = %id, existed, "Note deleted");

    Ok(Json(DeleteNoteResponse {
        message: "Note deleted successfully!".to_string(),
    }))
}

/// Build note routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/notes", get(list_notes).post(create_note))
        .route(
            "/api/notes/{id}",
            get(get_note).put(update_note).delete(delete_note),
        )
}

// ============================================================================
// Tests
// ============================================================================
