//! Note endpoints

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidUuid};
use crate::http::state::AppState;
use crate::models::{Note, NoteTitle};

/// Create note request
///
/// A missing `title` decodes as empty and is then rejected by validation.
/// Clients that send the capitalised `Title` key are accepted too.
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default, alias = "Title")]
    pub title: String,
}

/// POST /notes - create a new note
async fn create_note(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    let title =
        NoteTitle::new(req.title).map_err(|_| ApiError::BadRequest("Title is required"))?;
    let note = Note::new(title);

    state
        .notes()
        .create(&note)
        .await
        .map_err(ApiError::database_with_detail("Failed to create note"))?;

    tracing::debug!(id = %note.id, "Created note");
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /notes - list all notes, newest first
async fn list_notes(State(state): State<AppState>) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = state
        .notes()
        .list()
        .await
        .map_err(ApiError::database("Failed to get notes"))?;
    Ok(Json(notes))
}

/// GET /notes/{id} - get a single note
///
/// Store failures other than a missing row are logged but still answered
/// with 404.
async fn get_note(
    State(state): State<AppState>,
    ValidUuid(id): ValidUuid,
) -> Result<Json<Note>, ApiError> {
    let note = state.notes().get(id).await.map_err(|e| {
        if !e.is_not_found() {
            tracing::error!(error = %e, %id, "Failed to get note");
        }
        ApiError::NotFound("Note not found")
    })?;
    Ok(Json(note))
}

/// Note routes
///
/// Titles have no length cap, so request bodies are not size limited.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", get(get_note))
        .layer(DefaultBodyLimit::disable())
}
