//! Book endpoints

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{Route, RouteRequest};
use crate::{
    error::{AppError, AppResult},
    models::{BookWithEntries, CreateBook, EntrySummary},
    repository::Queries,
};

/// `GET /books` lists every book, `POST /books` creates one
pub struct Books {
    queries: Arc<dyn Queries>,
}

impl Books {
    pub fn new(queries: Arc<dyn Queries>) -> Self {
        Self { queries }
    }
}

#[async_trait]
impl Route for Books {
    fn path(&self) -> &'static str {
        "/books"
    }

    fn methods(&self) -> &'static [Method] {
        &[Method::GET, Method::POST]
    }

    async fn handle(&self, req: RouteRequest) -> AppResult<Response> {
        match req.method {
            Method::GET => {
                let books = self.queries.list_books().await?;
                Ok(Json(books).into_response())
            }
            Method::POST => {
                let data: CreateBook = req.json()?;
                let book = self.queries.create_book(&data.name).await?;
                tracing::info!(id = book.id, "Created book");
                Ok(StatusCode::OK.into_response())
            }
            _ => Err(AppError::http(
                StatusCode::METHOD_NOT_ALLOWED,
                "unsupported request method",
            )),
        }
    }
}

/// `GET /books/{book_id}` returns a book with its entries
pub struct GetBook {
    queries: Arc<dyn Queries>,
}

impl GetBook {
    pub fn new(queries: Arc<dyn Queries>) -> Self {
        Self { queries }
    }
}

#[async_trait]
impl Route for GetBook {
    fn path(&self) -> &'static str {
        "/books/{book_id}"
    }

    fn methods(&self) -> &'static [Method] {
        &[Method::GET]
    }

    async fn handle(&self, req: RouteRequest) -> AppResult<Response> {
        let book_id: i32 = req.param("book_id")?;
        let entries = self.queries.entries_by_book(book_id).await?;

        Ok(Json(BookWithEntries {
            id: book_id,
            entries: entries.into_iter().map(EntrySummary::from).collect(),
        })
        .into_response())
    }
}
