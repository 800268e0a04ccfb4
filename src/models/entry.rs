//! Entry model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Entry record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Entry {
    pub id: i32,
    pub book_id: i32,
    /// Free-form entry kind (note, quote, ...)
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub entry_type: String,
    pub content: String,
    pub key: Option<String>,
}

/// Entry as listed under its book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySummary {
    pub id: i32,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub content: String,
}

impl From<Entry> for EntrySummary {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            entry_type: entry.entry_type,
            content: entry.content,
        }
    }
}

/// Create entry request
#[derive(Debug, Deserialize)]
pub struct CreateEntry {
    pub content: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub key: Option<String>,
}

/// Parameters handed to the store when inserting an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEntryParams {
    pub book_id: i32,
    pub entry_type: String,
    pub content: String,
    pub key: Option<String>,
}

impl CreateEntryParams {
    pub fn new(book_id: i32, data: CreateEntry) -> Self {
        Self {
            book_id,
            entry_type: data.entry_type,
            content: data.content,
            key: data.key,
        }
    }
}
