use async_trait::async_trait;
use sqlx::PgPool;

use super::models::{NewUser, Note, NotePage, NoteQuery, User};
use super::store::{NoteStore, StoreError, UserStore};

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at, updated_at";
const NOTE_COLUMNS: &str = "id, title, content, user_id, created_at, updated_at";

/// Postgres-backed user store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    StoreError::Conflict(format!("email '{}' already registered", user.email))
                }
                other => StoreError::Sqlx(other),
            })
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Postgres-backed note store.
#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Wrap a search term for ILIKE, escaping its wildcards.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn create(&self, user_id: i64, title: &str, content: &str) -> Result<Note, StoreError> {
        let sql = format!(
            "INSERT INTO notes (title, content, user_id) VALUES ($1, $2, $3) RETURNING {}",
            NOTE_COLUMNS
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(title)
            .bind(content)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(note)
    }

    async fn list(&self, user_id: i64, query: &NoteQuery) -> Result<NotePage, StoreError> {
        let pattern = query.search.as_deref().map(like_pattern);
        let filter = "user_id = $1 AND ($2::TEXT IS NULL OR title ILIKE $2 OR content ILIKE $2)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM notes WHERE {}", filter))
            .bind(user_id)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {} FROM notes WHERE {} ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4",
            NOTE_COLUMNS, filter
        );
        let notes = sqlx::query_as::<_, Note>(&sql)
            .bind(user_id)
            .bind(&pattern)
            .bind(query.per_page)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(NotePage { notes, total })
    }

    async fn find(&self, id: i64, user_id: i64) -> Result<Option<Note>, StoreError> {
        let sql = format!("SELECT {} FROM notes WHERE id = $1 AND user_id = $2", NOTE_COLUMNS);
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(note)
    }

    async fn update(&self, id: i64, user_id: i64, title: &str, content: &str) -> Result<Option<Note>, StoreError> {
        let sql = format!(
            "UPDATE notes SET title = $3, content = $4, updated_at = now() \
             WHERE id = $1 AND user_id = $2 RETURNING {}",
            NOTE_COLUMNS
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(title)
            .bind(content)
            .fetch_optional(&self.pool)
            .await?;
        Ok(note)
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("milk"), "%milk%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }
}
