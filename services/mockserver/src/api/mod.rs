//! HTTP adapter over the engine.
//!
//! # Purpose
//! Exposes route handler modules plus the pieces every handler shares: caller
//! extraction from HTTP Basic credentials, body validation and decoding, and
//! turning an engine [`Reply`] into a response.
pub mod error;
pub mod index_sets;
pub mod inputs;
pub mod openapi;
pub mod roles;
pub mod users;

use crate::api::error::{ApiError, api_not_found, api_validation_error};
use crate::auth::Caller;
use crate::logic::Reply;
use crate::validate::{FieldSpec, validate_body};
use axum::Json;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::convert::Infallible;

/// Identify the caller from `Authorization: Basic ...`.
///
/// Only the user name is used; the password is not checked. Anything else,
/// including a malformed header, yields [`Caller::Anonymous`] and is rejected
/// later by the gate if authentication is on.
pub fn caller_from_headers(headers: &HeaderMap) -> Caller {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))
        .and_then(|encoded| STANDARD.decode(encoded.trim()).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok())
        .and_then(|credentials| {
            let username = credentials
                .split_once(':')
                .map_or(credentials.as_str(), |(user, _)| user);
            (!username.is_empty()).then(|| Caller::user(username))
        })
        .unwrap_or(Caller::Anonymous)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(caller_from_headers(&parts.headers))
    }
}

/// Validate the raw body against `spec`, then decode it into `T`.
pub(crate) fn decode_body<T: DeserializeOwned>(
    bytes: &[u8],
    spec: &FieldSpec,
) -> Result<T, ApiError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| api_validation_error(format!("request body is not valid JSON: {err}")))?;
    let fields = validate_body(value, spec)?;
    serde_json::from_value(Value::Object(fields))
        .map_err(|err| api_validation_error(format!("failed to decode request body: {err}")))
}

/// `200` with a JSON body, or a bare status when the reply has none.
pub(crate) fn respond<T: Serialize>(reply: Reply<T>) -> Response {
    match reply.body {
        Some(body) => (reply.status, Json(body)).into_response(),
        None => reply.status.into_response(),
    }
}

pub(crate) async fn route_not_found(uri: Uri) -> ApiError {
    api_not_found(&format!("no route for {}", uri.path()))
}
