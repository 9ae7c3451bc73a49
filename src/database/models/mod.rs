pub mod note;
pub mod user;

pub use note::{
    Note, NoteCreateRequest, NotePage, NoteQuery, NoteRequest, NoteResponse, NoteUpdateRequest, PaginatedNotes,
};
pub use user::{LoginRequest, NewUser, RegisterRequest, User, UserResponse};
