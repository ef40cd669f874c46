//! HTTP error mapping.
//!
//! # Responsibility
//! - Translate service failures into status codes and the uniform
//!   `{"error":{"message": ...}}` body.
//!
//! # Invariants
//! - Storage and internal failures never leak their detail to clients; the
//!   detail is logged instead.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use std::any::Any;
use std::error::Error;
use std::fmt::{Display, Formatter};
use wordbook_core::WordServiceError;

pub const NOT_FOUND_MESSAGE: &str = "Not found";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Error returned by every route handler.
#[derive(Debug)]
pub enum ApiError {
    /// Route, word or definition does not exist.
    NotFound,
    /// Malformed body, query, or vote direction.
    InvalidRequest(String),
    /// Body refused before parsing (too large, unsupported media type).
    Rejected { status: StatusCode, message: String },
    /// Storage or runtime failure; the detail is for logs only.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the client.
    pub fn public_message(&self) -> &str {
        match self {
            Self::NotFound => NOT_FOUND_MESSAGE,
            Self::InvalidRequest(message) | Self::Rejected { message, .. } => message,
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => f.write_str(NOT_FOUND_MESSAGE),
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::Rejected { status, message } => write!(f, "rejected ({status}): {message}"),
            Self::Internal(detail) => write!(f, "internal error: {detail}"),
        }
    }
}

impl Error for ApiError {}

impl From<WordServiceError> for ApiError {
    fn from(value: WordServiceError) -> Self {
        match value {
            WordServiceError::WordNotFound(_) | WordServiceError::DefinitionNotFound { .. } => {
                Self::NotFound
            }
            WordServiceError::InvalidRequest(message) => Self::InvalidRequest(message),
            WordServiceError::Repo(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        let status = value.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE || status == StatusCode::UNSUPPORTED_MEDIA_TYPE {
            return Self::Rejected {
                status,
                message: value.body_text(),
            };
        }
        Self::InvalidRequest(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::InvalidRequest(value.body_text())
    }
}

/// A path segment that does not even decode can never name a word or definition.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        Self::NotFound
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!("event=http_error module=server status=error error={detail}");
        }
        error_response(self.status(), self.public_message())
    }
}

/// Builds the uniform error body.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": { "message": message } }))).into_response()
}

/// Converts a handler panic into a 500 with the uniform body.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}
