use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::TokenService;
use crate::database::models::User;
use crate::database::{StoreError, UserStore};
use crate::error::ApiError;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity bound to the current request after successful authentication
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user: User,
    pub user_id: i64,
}

/// Why a request was turned away. Every variant answers 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingHeader,
    MalformedScheme,
    MissingToken,
    InvalidToken,
    UserNotFound,
}

impl AuthRejection {
    pub fn message(&self) -> &'static str {
        match self {
            AuthRejection::MissingHeader => "Authorization header is required",
            AuthRejection::MalformedScheme => "Authorization header must start with 'Bearer '",
            AuthRejection::MissingToken => "Token is required",
            AuthRejection::InvalidToken => "Invalid or expired token",
            AuthRejection::UserNotFound => "User not found",
        }
    }
}

#[derive(Debug)]
pub enum AuthError {
    Rejected(AuthRejection),
    Store(StoreError),
}

impl From<AuthRejection> for AuthError {
    fn from(rejection: AuthRejection) -> Self {
        AuthError::Rejected(rejection)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Rejected(rejection) => ApiError::unauthorized(rejection.message()),
            AuthError::Store(e) => {
                tracing::error!("User lookup failed during authentication: {}", e);
                ApiError::internal_server_error("Failed to authenticate request")
            }
        }
    }
}

/// Extract the bearer token from the Authorization header. Only the prefix is
/// stripped; surrounding whitespace stays part of the token.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthRejection::MissingHeader)?;
    let value = header.to_str().map_err(|_| AuthRejection::MalformedScheme)?;
    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthRejection::MalformedScheme)?;

    if token.is_empty() {
        return Err(AuthRejection::MissingToken);
    }
    Ok(token)
}

/// Run the full header → token → store check for one request.
pub async fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
    users: &dyn UserStore,
) -> Result<AuthUser, AuthError> {
    let token = bearer_token(headers)?;

    // Verification failures all collapse into one client-facing answer
    let claims = tokens.verify(token).map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AuthRejection::InvalidToken
    })?;

    let user = users
        .find_by_id(claims.user_id)
        .await
        .map_err(AuthError::Store)?
        .ok_or_else(|| {
            tracing::warn!("Token subject {} no longer exists", claims.user_id);
            AuthRejection::UserNotFound
        })?;

    Ok(AuthUser {
        user_id: claims.user_id,
        user,
    })
}

/// Bearer token authentication middleware for protected routes
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = authenticate(request.headers(), &state.tokens, state.users.as_ref()).await?;

    tracing::debug!("Authenticated user {}", auth_user.user_id);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("User not found in context"))
    }
}
