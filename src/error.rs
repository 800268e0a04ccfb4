//! Error types for Bookshelf server

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message sent for any failure that is not an explicit HTTP error.
pub const GENERIC_ERROR_MESSAGE: &str = "something went terribly wrong";

/// Message sent when a handler panics.
pub const PANIC_ERROR_MESSAGE: &str = "internal server error";

/// Message sent when a request body cannot be decoded.
pub const INVALID_BODY_MESSAGE: &str = "invalid request body";

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Main application error type
///
/// Only [`AppError::Http`] carries a client-visible status and message. The
/// other variants are opaque: they are logged and collapse to a generic 500.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: String,
        #[source]
        cause: Option<Cause>,
    },

    #[error("Database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Http {
            status,
            message: message.into(),
            cause: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::http(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::http(StatusCode::NOT_FOUND, message)
    }

    /// Attach the underlying error for server-side diagnostics.
    ///
    /// Has no effect on opaque variants, which already are their own cause.
    pub fn with_cause(self, err: impl Into<Cause>) -> Self {
        match self {
            AppError::Http {
                status, message, ..
            } => AppError::Http {
                status,
                message,
                cause: Some(err.into()),
            },
            other => other,
        }
    }

    /// Status code and client-safe message for this error.
    pub fn status_and_message(&self) -> (StatusCode, &str) {
        match self {
            AppError::Http {
                status, message, ..
            } => (*status, message.as_str()),
            AppError::Store(_) | AppError::Other(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_ERROR_MESSAGE)
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
