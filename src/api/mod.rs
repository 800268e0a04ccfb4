//! API route descriptors for Bookshelf REST endpoints

pub mod books;
pub mod dispatch;
pub mod entries;
pub mod health;
pub mod router;

use std::{collections::HashMap, str::FromStr, sync::Arc};

use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::{HeaderMap, Method},
    response::Response,
};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult, INVALID_BODY_MESSAGE},
    repository::Queries,
};

pub use router::build_router;

/// A path pattern, the methods it accepts and the logic handling it.
///
/// Patterns use `{name}` segments; captured values are available through
/// [`RouteRequest::param`] when `handle` runs. Handlers write their success
/// response themselves and return errors for the dispatcher to translate.
#[async_trait]
pub trait Route: Send + Sync + 'static {
    fn path(&self) -> &'static str;

    /// Never empty
    fn methods(&self) -> &'static [Method];

    async fn handle(&self, req: RouteRequest) -> AppResult<Response>;
}

/// Everything a route sees of an inbound request
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub method: Method,
    pub params: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RouteRequest {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Parse a captured path segment, rejecting bad input with a 400
    pub fn param<T>(&self, name: &str) -> AppResult<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let message = format!("invalid path parameter: {}", name);
        let raw = self
            .params
            .get(name)
            .ok_or_else(|| AppError::bad_request(message.clone()))?;
        raw.parse::<T>()
            .map_err(|e| AppError::bad_request(message).with_cause(e))
    }

    /// Decode the JSON body, rejecting bad input with a 400
    pub fn json<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| AppError::bad_request(INVALID_BODY_MESSAGE).with_cause(e))
    }
}

/// Every route the server exposes, in registration order
pub fn routes(queries: Arc<dyn Queries>) -> Vec<Arc<dyn Route>> {
    vec![
        Arc::new(health::Health),
        Arc::new(books::Books::new(queries.clone())),
        Arc::new(books::GetBook::new(queries.clone())),
        Arc::new(entries::CreateEntry::new(queries.clone())),
        Arc::new(entries::DeleteEntry::new(queries)),
    ]
}
