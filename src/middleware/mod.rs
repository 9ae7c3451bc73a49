pub mod auth;
pub mod response;

pub use auth::{authenticate, require_auth, AuthError, AuthRejection, AuthUser};
pub use response::{ApiResponse, ApiResult};
