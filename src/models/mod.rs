//! Data models for Bookshelf

pub mod book;
pub mod entry;

// Re-export commonly used types
pub use book::{Book, BookWithEntries, CreateBook};
pub use entry::{CreateEntry, CreateEntryParams, Entry, EntrySummary};
