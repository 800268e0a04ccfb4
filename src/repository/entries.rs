//! Entry queries

use super::PgQueries;
use crate::{
    error::{AppError, AppResult},
    models::{CreateEntryParams, Entry},
};

impl PgQueries {
    /// Entries of a book, oldest first
    pub async fn entries_by_book_id(&self, book_id: i32) -> AppResult<Vec<Entry>> {
        let rows = sqlx::query_as::<_, Entry>(
            "SELECT id, book_id, type, content, key FROM entries WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create an entry
    pub async fn entries_create(&self, params: &CreateEntryParams) -> AppResult<Entry> {
        let row = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (book_id, type, content, key)
            VALUES ($1, $2, $3, $4)
            RETURNING id, book_id, type, content, key
            "#,
        )
        .bind(params.book_id)
        .bind(&params.entry_type)
        .bind(&params.content)
        .bind(&params.key)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete an entry scoped to its book
    pub async fn entries_delete(&self, id: i32, book_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1 AND book_id = $2")
            .bind(id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Entry {} not found in book {}",
                id, book_id
            )));
        }
        Ok(())
    }
}
