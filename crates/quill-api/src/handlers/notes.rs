//! Note CRUD handlers.
//!
//! Each handler takes the resolved [`AuthOwner`] identity from the
//! authorization gate; the owner id flows into every repository call, and
//! these four handlers are the only readers/writers of the note store.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use quill_core::{CreateNoteRequest, UpdateNoteRequest};

use crate::error::ApiError;
use crate::extract::AuthOwner;
use crate::AppState;

/// GET /api/notes — all of the caller's notes, pinned first, then most
/// recently modified. No pagination; personal datasets stay small.
pub async fn list_notes(
    State(state): State<AppState>,
    owner: AuthOwner,
) -> Result<impl IntoResponse, ApiError> {
    let notes = state.notes.list(owner.id).await?;
    Ok(Json(notes))
}

/// POST /api/notes — create a note owned by the caller. Any client-supplied
/// owner field was already dropped during deserialization.
pub async fn create_note(
    State(state): State<AppState>,
    owner: AuthOwner,
    Json(body): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.notes.insert(owner.id, body).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/notes/:id — partial update, owner-scoped. A nonexistent id and
/// another owner's id fail identically.
pub async fn update_note(
    State(state): State<AppState>,
    owner: AuthOwner,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.notes.update(owner.id, id, body).await?;
    Ok(Json(note))
}

/// DELETE /api/notes/:id — owner-scoped delete with a confirmation body.
pub async fn delete_note(
    State(state): State<AppState>,
    owner: AuthOwner,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.notes.delete(owner.id, id).await?;
    Ok(Json(serde_json::json!({ "message": "Note deleted" })))
}
