pub mod password;
pub mod token;

pub use password::{hash_blocking, verify_blocking, Argon2Hasher, PasswordError, PasswordHasher};
pub use token::{Claims, TokenError, TokenService};
