use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::{json, Value};

use super::{parse_note_id, NOTE_NOT_FOUND};
use crate::app::AppState;
use crate::database::models::{NoteResponse, NoteUpdateRequest};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::validation::validate;

/// GET /api/v1/notes/:id - Fetch one of the caller's notes
pub async fn show(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<NoteResponse> {
    let id = parse_note_id(&id)?;

    let note = state
        .notes
        .find(id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOTE_NOT_FOUND))?;

    Ok(ApiResponse::success(note.to_response()).message("Note retrieved successfully"))
}

/// PUT /api/v1/notes/:id - Replace title and content
///
/// The id is checked before the body, so a bad id with a bad body answers
/// "Invalid note ID".
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<NoteUpdateRequest>, JsonRejection>,
) -> ApiResult<NoteResponse> {
    let id = parse_note_id(&id)?;
    let Json(req) = payload?;

    let errors = validate(&req);
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let note = state
        .notes
        .update(id, auth.user_id, &req.title, &req.content)
        .await?
        .ok_or_else(|| ApiError::not_found(NOTE_NOT_FOUND))?;

    Ok(ApiResponse::success(note.to_response()).message("Note updated successfully"))
}

/// DELETE /api/v1/notes/:id - Remove one of the caller's notes
pub async fn remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_note_id(&id)?;

    if !state.notes.delete(id, auth.user_id).await? {
        return Err(ApiError::not_found(NOTE_NOT_FOUND));
    }

    tracing::debug!("User {} deleted note {}", auth.user_id, id);

    Ok(ApiResponse::success(json!({ "id": id })).message("Note deleted successfully"))
}
