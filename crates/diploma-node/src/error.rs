//! HTTP error responses for the gateway.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use diploma_core::CoreError;

/// JSON error body: `{"status": "404", "error": "credential not found: ..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
}

/// Everything a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Registry rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),
    /// The request body could not be read as JSON.
    #[error("{0}")]
    BadRequest(String),
    /// Missing or wrong shared-secret token.
    #[error("Unauthorized")]
    Unauthorized,
    /// The event loop is gone or dropped the reply.
    #[error("{0}")]
    Unavailable(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(CoreError::Validation { .. }) => StatusCode::BAD_REQUEST,
            Self::Core(CoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Core(CoreError::InvalidState(_)) => StatusCode::BAD_REQUEST,
            Self::Core(CoreError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage details stay in the log.
        let error = match &self {
            Self::Core(CoreError::Storage(detail)) => {
                tracing::error!(error = %detail, "storage failure");
                "internal storage error".to_string()
            }
            Self::Unavailable(reason) => {
                tracing::error!(reason, "node event loop unavailable");
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            status: status.as_u16().to_string(),
            error,
        };
        (status, Json(body)).into_response()
    }
}
