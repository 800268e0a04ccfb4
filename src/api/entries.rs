//! Entry endpoints

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

use super::{Route, RouteRequest};
use crate::{
    error::AppResult,
    models::{CreateEntry as CreateEntryBody, CreateEntryParams},
    repository::Queries,
};

/// `POST /books/{book_id}/entries`
pub struct CreateEntry {
    queries: Arc<dyn Queries>,
}

impl CreateEntry {
    pub fn new(queries: Arc<dyn Queries>) -> Self {
        Self { queries }
    }
}

#[async_trait]
impl Route for CreateEntry {
    fn path(&self) -> &'static str {
        "/books/{book_id}/entries"
    }

    fn methods(&self) -> &'static [Method] {
        &[Method::POST]
    }

    async fn handle(&self, req: RouteRequest) -> AppResult<Response> {
        let data: CreateEntryBody = req.json()?;
        let book_id: i32 = req.param("book_id")?;

        let entry = self
            .queries
            .create_entry(CreateEntryParams::new(book_id, data))
            .await?;
        tracing::info!(id = entry.id, book_id, "Created entry");

        Ok(StatusCode::OK.into_response())
    }
}

/// `DELETE /books/{book_id}/entries/{entry_id}`
pub struct DeleteEntry {
    queries: Arc<dyn Queries>,
}

impl DeleteEntry {
    pub fn new(queries: Arc<dyn Queries>) -> Self {
        Self { queries }
    }
}

#[async_trait]
impl Route for DeleteEntry {
    fn path(&self) -> &'static str {
        "/books/{book_id}/entries/{entry_id}"
    }

    fn methods(&self) -> &'static [Method] {
        &[Method::DELETE]
    }

    async fn handle(&self, req: RouteRequest) -> AppResult<Response> {
        let entry_id: i32 = req.param("entry_id")?;
        let book_id: i32 = req.param("book_id")?;

        self.queries.delete_entry(entry_id, book_id).await?;

        Ok(StatusCode::OK.into_response())
    }
}
