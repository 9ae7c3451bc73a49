// handlers/public/auth/mod.rs - Token acquisition endpoints
//
// Both handlers validate the body against its rule table before touching the
// store, and answer with the public user view plus a fresh bearer token.

use serde::{Deserialize, Serialize};

use crate::database::models::UserResponse;

pub mod login; // POST /api/v1/auth/login
pub mod register; // POST /api/v1/auth/register

pub use login::login;
pub use register::register;

/// Response body shared by register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: UserResponse,
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}
