use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::AuthPayload;
use crate::app::AppState;
use crate::auth::hash_blocking;
use crate::database::models::{NewUser, RegisterRequest};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::validate;

const DUPLICATE_EMAIL: &str = "User with this email already exists";

/// POST /api/v1/auth/register - Create an account and receive a token
///
/// Expected Input:
/// ```json
/// { "name": "Jane Smith", "email": "jane@example.com", "password": "password123" }
/// ```
///
/// Responds 201 with `{ user, token, expires_in }`, 400 on validation
/// failure, 409 when the email is taken.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<AuthPayload> {
    let Json(req) = payload?;

    let errors = validate(&req);
    if !errors.is_empty() {
        return Err(errors.into());
    }

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(ApiError::conflict(DUPLICATE_EMAIL));
    }

    let password_hash = hash_blocking(state.passwords.clone(), req.password).await?;

    let user = state
        .users
        .create(NewUser {
            name: req.name,
            email: req.email,
            password_hash,
        })
        .await
        .map_err(|e| match e {
            // Lost a race with a concurrent registration
            StoreError::Conflict(_) => ApiError::conflict(DUPLICATE_EMAIL),
            other => other.into(),
        })?;

    let token = state.tokens.issue(user.id, &user.email)?;
    tracing::info!("Registered user {}", user.id);

    Ok(ApiResponse::created(AuthPayload {
        user: user.to_response(),
        token,
        expires_in: state.tokens.expires_in(),
    })
    .message("User registered successfully"))
}
