use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::AuthPayload;
use crate::app::AppState;
use crate::auth::verify_blocking;
use crate::database::models::LoginRequest;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::validate;

/// Same answer for unknown email and wrong password
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// POST /api/v1/auth/login - Exchange credentials for a bearer token
///
/// Expected Input:
/// ```json
/// { "email": "jane@example.com", "password": "password123" }
/// ```
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<AuthPayload> {
    let Json(req) = payload?;

    let errors = validate(&req);
    if !errors.is_empty() {
        return Err(errors.into());
    }

    let user = match state.users.find_by_email(&req.email).await? {
        Some(user) => user,
        None => {
            tracing::info!("Login failed: unknown email");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    let matches = verify_blocking(state.passwords.clone(), req.password, user.password_hash.clone()).await?;
    if !matches {
        tracing::info!("Login failed: bad password for user {}", user.id);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(user.id, &user.email)?;

    Ok(ApiResponse::success(AuthPayload {
        user: user.to_response(),
        token,
        expires_in: state.tokens.expires_in(),
    })
    .message("Login successful"))
}
