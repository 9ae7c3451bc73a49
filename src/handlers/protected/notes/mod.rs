// handlers/protected/notes/mod.rs - Note CRUD for the authenticated user
//
// Collection endpoints live in create.rs and list.rs, single-note endpoints
// in record.rs.

use crate::error::ApiError;

pub mod create; // POST /api/v1/notes
pub mod list; // GET /api/v1/notes
pub mod record; // GET/PUT/DELETE /api/v1/notes/:id

pub use create::create;
pub use list::list;
pub use record::{remove, show, update};

pub(crate) const NOTE_NOT_FOUND: &str = "Note not found";

/// Parse a note id path segment. Only plain non-negative integers qualify.
pub(crate) fn parse_note_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::bad_request("Invalid note ID"));
    }
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("Invalid note ID"))
}
