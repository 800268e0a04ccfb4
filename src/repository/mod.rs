//! Repository layer for database operations

pub mod books;
pub mod entries;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, CreateEntryParams, Entry},
};

/// Data access used by the route handlers
///
/// Every failure is opaque to callers except the ones an implementation
/// deliberately raises as [`crate::AppError::Http`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Queries: Send + Sync {
    async fn list_books(&self) -> AppResult<Vec<Book>>;

    async fn create_book(&self, name: &str) -> AppResult<Book>;

    async fn entries_by_book(&self, book_id: i32) -> AppResult<Vec<Entry>>;

    async fn create_entry(&self, params: CreateEntryParams) -> AppResult<Entry>;

    /// Fails with a 404 error when no entry `id` belongs to `book_id`
    async fn delete_entry(&self, id: i32, book_id: i32) -> AppResult<()>;
}

/// Postgres-backed queries sharing one connection pool
#[derive(Clone)]
pub struct PgQueries {
    pool: Pool<Postgres>,
}

impl PgQueries {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Queries for PgQueries {
    async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.books_list().await
    }

    async fn create_book(&self, name: &str) -> AppResult<Book> {
        self.books_create(name).await
    }

    async fn entries_by_book(&self, book_id: i32) -> AppResult<Vec<Entry>> {
        self.entries_by_book_id(book_id).await
    }

    async fn create_entry(&self, params: CreateEntryParams) -> AppResult<Entry> {
        self.entries_create(&params).await
    }

    async fn delete_entry(&self, id: i32, book_id: i32) -> AppResult<()> {
        self.entries_delete(id, book_id).await
    }
}
