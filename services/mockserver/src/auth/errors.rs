use axum::http::StatusCode;
use thiserror::Error;

/// Structured deny produced by the gate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
}

impl AuthzError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthzError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthzError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}
