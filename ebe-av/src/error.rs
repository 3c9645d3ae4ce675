//! Error types for ebe-av
//!
//! Every route catches at the handler boundary: known server errors carry
//! their own status code and message, schema failures become 400, anything
//! else becomes a 500 without leaking details.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ebe_common::api::ErrorResponse;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Error raised by backend services, carrying an HTTP status code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (status {status_code})")]
pub struct ServerError {
    pub message: String,
    pub status_code: u16,
}

impl ServerError {
    /// Server error with status 500
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_status(message, 500)
    }

    pub fn with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body did not parse or failed the schema (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Client exhausted its quota (429)
    #[error("Too many requests")]
    TooManyRequests,

    /// Known backend failure, surfaced verbatim
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad data.".to_string()),
            // The rate limiter answers with an `error` key, not `message`
            ApiError::TooManyRequests => {
                return (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({ "error": "Too many requests." })),
                )
                    .into_response();
            }
            ApiError::Server(err) => (err.status(), err.message),
            ApiError::Other(ref err) => {
                error!(error = %err, "Unhandled error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unknown error encountered.".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
