//! Translation of handler outcomes into HTTP responses
//!
//! Handlers return [`AppResult`]; this is the only place that turns an
//! [`AppError`] into a status code and a JSON body. Panics are contained one
//! level up by [`panic_response`], installed on the router as a
//! [`tower_http::catch_panic::CatchPanicLayer`].

use std::{any::Any, sync::Arc};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::Instrument;

use super::{Route, RouteRequest};
use crate::error::{AppError, ErrorResponse, PANIC_ERROR_MESSAGE};

/// Run a route and always come back with a response
pub async fn dispatch(route: Arc<dyn Route>, req: RouteRequest) -> Response {
    let span = tracing::debug_span!("route", path = route.path(), method = %req.method);
    match route.handle(req).instrument(span).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Http {
                status,
                cause: Some(cause),
                ..
            } => {
                tracing::debug!(status = status.as_u16(), "Request failed: {} ({})", self, cause);
            }
            AppError::Http { .. } => {}
            AppError::Store(e) => tracing::error!("Database error: {:?}", e),
            AppError::Other(e) => tracing::error!("Internal error: {:?}", e),
        }

        let (status, message) = self.status_and_message();
        let body = Json(ErrorResponse {
            message: message.to_string(),
        });

        (status, body).into_response()
    }
}

/// Fixed 500 response for a handler that panicked
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    let body = Json(ErrorResponse {
        message: PANIC_ERROR_MESSAGE.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}
