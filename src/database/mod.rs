pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{connect, ensure_schema, DatabaseError};
pub use memory::MemoryStore;
pub use postgres::{PgNoteStore, PgUserStore};
pub use store::{NoteStore, StoreError, UserStore};
