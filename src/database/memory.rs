// In-process store used by `serve --memory` and the router tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{NewUser, Note, NotePage, NoteQuery, User};
use super::store::{NoteStore, StoreError, UserStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    notes: Vec<Note>,
    next_user_id: i64,
    next_note_id: i64,
}

/// Shared in-memory tables implementing both store traits.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches_search(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle) || note.content.to_lowercase().contains(needle)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(format!("email '{}' already registered", user.email)));
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: tables.next_user_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        let removed = tables.users.len() != before;
        if removed {
            tables.notes.retain(|n| n.user_id != id);
        }
        Ok(removed)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.tables.read().await.users.len() as i64)
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn create(&self, user_id: i64, title: &str, content: &str) -> Result<Note, StoreError> {
        let mut tables = self.tables.write().await;
        tables.next_note_id += 1;
        let now = Utc::now();
        let note = Note {
            id: tables.next_note_id,
            title: title.to_string(),
            content: content.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.notes.push(note.clone());
        Ok(note)
    }

    async fn list(&self, user_id: i64, query: &NoteQuery) -> Result<NotePage, StoreError> {
        let tables = self.tables.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut matching: Vec<&Note> = tables
            .notes
            .iter()
            .filter(|n| n.user_id == user_id)
            .filter(|n| needle.as_deref().map_or(true, |s| matches_search(n, s)))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let notes = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.per_page).unwrap_or(0))
            .cloned()
            .collect();

        Ok(NotePage { notes, total })
    }

    async fn find(&self, id: i64, user_id: i64) -> Result<Option<Note>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .find(|n| n.id == id && n.user_id == user_id)
            .cloned())
    }

    async fn update(&self, id: i64, user_id: i64, title: &str, content: &str) -> Result<Option<Note>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(note) = tables
            .notes
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        else {
            return Ok(None);
        };

        note.title = title.to_string();
        note.content = content.to_string();
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let before = tables.notes.len();
        tables.notes.retain(|n| !(n.id == id && n.user_id == user_id));
        Ok(tables.notes.len() != before)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.tables.read().await.notes.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        UserStore::create(&store, new_user("a@b.co")).await.unwrap();
        let err = UserStore::create(&store, new_user("a@b.co")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_notes_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = UserStore::create(&store, new_user("alice@example.com")).await.unwrap();
        let bob = UserStore::create(&store, new_user("bob@example.com")).await.unwrap();

        let note = NoteStore::create(&store, alice.id, "Shopping List", "milk").await.unwrap();

        assert!(store.find(note.id, bob.id).await.unwrap().is_none());
        assert!(store.update(note.id, bob.id, "x", "y").await.unwrap().is_none());
        assert!(!NoteStore::delete(&store, note.id, bob.id).await.unwrap());
        assert!(store.find(note.id, alice.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_search_and_paging() {
        let store = MemoryStore::new();
        let user = UserStore::create(&store, new_user("a@b.co")).await.unwrap();
        for i in 0..5 {
            NoteStore::create(&store, user.id, &format!("Note {}", i), "body").await.unwrap();
        }
        NoteStore::create(&store, user.id, "Groceries", "Buy MILK").await.unwrap();

        let page = store
            .list(user.id, &NoteQuery::normalize(Some(1), Some(4), None))
            .await
            .unwrap();
        assert_eq!(page.total, 6);
        assert_eq!(page.notes.len(), 4);
        assert_eq!(page.notes[0].title, "Groceries");

        let found = store
            .list(user.id, &NoteQuery::normalize(None, None, Some("milk")))
            .await
            .unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.notes[0].content, "Buy MILK");
    }

    #[tokio::test]
    async fn test_deleting_user_removes_notes() {
        let store = MemoryStore::new();
        let user = UserStore::create(&store, new_user("a@b.co")).await.unwrap();
        NoteStore::create(&store, user.id, "t", "c").await.unwrap();

        assert!(UserStore::delete(&store, user.id).await.unwrap());
        assert_eq!(NoteStore::count(&store).await.unwrap(), 0);
        assert!(store.find_by_id(user.id).await.unwrap().is_none());
    }
}
