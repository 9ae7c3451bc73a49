use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::app::AppState;
use crate::database::models::{NoteCreateRequest, NoteResponse};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::validation::validate;

/// POST /api/v1/notes - Create a note owned by the caller
///
/// Expected Input:
/// ```json
/// { "title": "Groceries", "content": "eggs, milk" }
/// ```
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<NoteCreateRequest>, JsonRejection>,
) -> ApiResult<NoteResponse> {
    let Json(req) = payload?;

    let errors = validate(&req);
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let note = state
        .notes
        .create(auth.user_id, &req.title, &req.content)
        .await?;

    tracing::debug!("User {} created note {}", auth.user_id, note.id);

    Ok(ApiResponse::created(note.to_response()).message("Note created successfully"))
}
