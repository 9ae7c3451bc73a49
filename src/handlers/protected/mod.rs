// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Security Level: Bearer token authentication
// Route Prefix: /api/v1/profile, /api/v1/notes
// Middleware: require_auth binds the AuthUser extension before any handler runs
//
// Every handler here extracts AuthUser and scopes its store access to that
// user. Notes owned by someone else are indistinguishable from missing ones.

use crate::database::models::UserResponse;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub mod notes; // Note CRUD scoped to the caller

/// GET /api/v1/profile - Public view of the authenticated user
pub async fn profile(auth: AuthUser) -> ApiResult<UserResponse> {
    Ok(ApiResponse::success(auth.user.to_response()).message("Profile retrieved successfully"))
}
