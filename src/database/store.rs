use async_trait::async_trait;
use thiserror::Error;

use super::models::{NewUser, Note, NotePage, NoteQuery, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Identity lookups and creation.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// Remove a user and everything they own. Outstanding tokens stop working.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Notes, always scoped to their owner.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create(&self, user_id: i64, title: &str, content: &str) -> Result<Note, StoreError>;

    /// Newest first; search matches title or content case-insensitively.
    async fn list(&self, user_id: i64, query: &NoteQuery) -> Result<NotePage, StoreError>;

    async fn find(&self, id: i64, user_id: i64) -> Result<Option<Note>, StoreError>;

    async fn update(&self, id: i64, user_id: i64, title: &str, content: &str) -> Result<Option<Note>, StoreError>;

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;
}
