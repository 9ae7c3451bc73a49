use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::{RuleTable, Validate};

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Clone, FromRow)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    pub fn to_response(&self) -> NoteResponse {
        NoteResponse {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of note create and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NoteRequest {
    pub title: String,
    pub content: String,
}

pub type NoteCreateRequest = NoteRequest;
pub type NoteUpdateRequest = NoteRequest;

impl Validate for NoteRequest {
    fn rule_table() -> &'static RuleTable<Self> {
        static RULES: Lazy<RuleTable<NoteRequest>> = Lazy::new(|| {
            RuleTable::<NoteRequest>::new()
                .field("title", "required,min=1,max=200", |r| (&r.title).into())
                .field("content", "required,min=1", |r| (&r.content).into())
        });
        &RULES
    }
}

/// Listing parameters for a user's notes, already normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteQuery {
    pub page: i64,
    pub per_page: i64,
    pub search: Option<String>,
}

impl Default for NoteQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: None,
        }
    }
}

impl NoteQuery {
    /// Clamp raw query values: page below 1 becomes 1, per_page outside 1..=100 becomes 10.
    pub fn normalize(page: Option<i64>, per_page: Option<i64>, search: Option<&str>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let per_page = per_page
            .filter(|n| (1..=MAX_PER_PAGE).contains(n))
            .unwrap_or(DEFAULT_PER_PAGE);
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { page, per_page, search }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// One page of notes plus the total matching count.
#[derive(Debug, Clone)]
pub struct NotePage {
    pub notes: Vec<Note>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedNotes {
    pub notes: Vec<NoteResponse>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PaginatedNotes {
    pub fn new(page: NotePage, query: &NoteQuery) -> Self {
        let total_pages = (page.total + query.per_page - 1) / query.per_page;
        Self {
            notes: page.notes.iter().map(Note::to_response).collect(),
            total: page.total,
            page: query.page,
            per_page: query.per_page,
            total_pages,
            has_next: query.page < total_pages,
            has_previous: query.page > 1,
        }
    }
}
