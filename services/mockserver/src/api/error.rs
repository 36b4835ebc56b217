//! API error envelope.
//!
//! # Purpose
//! Turns engine failures into the uniform `{status, code, message}` JSON body
//! so every endpoint fails the same way.
//!
//! # Security considerations
//! - Internal and persistence errors are logged server-side with full detail
//!   and returned with a generic message.
use crate::logic::LogicError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use glmock_model::ErrorResponse;

/// Structured API error returned by handlers.
///
/// # Invariants
/// - `body.status` always equals `status`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                status: status.as_u16(),
                code: code.to_string(),
                message: message.into(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<LogicError> for ApiError {
    fn from(err: LogicError) -> Self {
        let status = err.status();
        match &err {
            LogicError::Persistence(_) => {
                tracing::error!(error = %err, "mock state could not be saved");
                ApiError::new(status, err.code(), "failed to save state")
            }
            LogicError::Internal(_) => {
                tracing::error!(error = %err, "internal engine error");
                ApiError::new(status, err.code(), "internal error")
            }
            _ => ApiError::new(status, err.code(), err.to_string()),
        }
    }
}

/// Build a 404 for paths no route matches.
pub fn api_not_found(message: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: impl Into<String>) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, "validation_error", message)
}
