//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::entry::EntrySummary;

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i32,
    pub name: String,
}

/// Create book request
#[derive(Debug, Deserialize)]
pub struct CreateBook {
    pub name: String,
}

/// A single book with the entries it holds
#[derive(Debug, Serialize, Deserialize)]
pub struct BookWithEntries {
    pub id: i32,
    pub entries: Vec<EntrySummary>,
}
