//! Health check endpoint

use async_trait::async_trait;
use axum::{
    http::Method,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{Route, RouteRequest};
use crate::error::AppResult;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

/// `GET /health`
pub struct Health;

#[async_trait]
impl Route for Health {
    fn path(&self) -> &'static str {
        "/health"
    }

    fn methods(&self) -> &'static [Method] {
        &[Method::GET]
    }

    async fn handle(&self, _req: RouteRequest) -> AppResult<Response> {
        Ok(Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
        .into_response())
    }
}
