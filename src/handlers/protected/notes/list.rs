use axum::extract::{Query, State};
use serde::Deserialize;

use crate::app::AppState;
use crate::database::models::{NoteQuery, PaginatedNotes};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// Raw query string. Values that fail to parse fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub search: Option<String>,
}

impl ListParams {
    pub fn to_query(&self) -> NoteQuery {
        NoteQuery::normalize(
            self.page.as_deref().and_then(|p| p.trim().parse().ok()),
            self.per_page.as_deref().and_then(|p| p.trim().parse().ok()),
            self.search.as_deref(),
        )
    }
}

/// GET /api/v1/notes - Page through the caller's notes, newest first
///
/// Query Parameters:
/// - `page`: 1-based page number (default 1)
/// - `per_page`: page size, 1..=100 (default 10)
/// - `search`: case-insensitive match on title or content
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> ApiResult<PaginatedNotes> {
    let query = params.to_query();
    let page = state.notes.list(auth.user_id, &query).await?;

    Ok(ApiResponse::success(PaginatedNotes::new(page, &query)).message("Notes retrieved successfully"))
}
