//! User handlers.
use crate::api::error::ApiError;
use crate::api::{decode_body, respond};
use crate::app::AppState;
use crate::auth::Caller;
use crate::validate::FieldSpec;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Response;
use glmock_model::{ErrorResponse, User, UserUpdateParams, UsersBody};

const MUTABLE_FIELDS: &[&str] = &[
    "email",
    "full_name",
    "password",
    "permissions",
    "roles",
    "timezone",
    "session_timeout_ms",
    "enabled",
];

const CREATE_FIELDS: FieldSpec = FieldSpec {
    required: &["username"],
    optional: MUTABLE_FIELDS,
    ignored: &["id", "external", "read_only", "created_at"],
    reject_unknown: true,
};

const UPDATE_FIELDS: FieldSpec = FieldSpec {
    required: &[],
    optional: MUTABLE_FIELDS,
    ignored: &["id", "username", "external", "read_only", "created_at"],
    reject_unknown: true,
};

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses((status = 200, description = "List users", body = UsersBody))
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.list_users(&caller).await?))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = User,
    responses(
        (status = 200, description = "User created", body = User),
        (status = 400, description = "Invalid user or unknown role", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse)
    )
)]
pub(crate) async fn create_user(
    State(state): State<AppState>,
    caller: Caller,
    body: Bytes,
) -> Result<Response, ApiError> {
    let user: User = decode_body(&body, &CREATE_FIELDS)?;
    Ok(respond(state.engine.create_user(&caller, user).await?))
}

#[utoipa::path(
    get,
    path = "/api/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "User name")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(username): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.get_user(&caller, &username).await?))
}

#[utoipa::path(
    put,
    path = "/api/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "User name")),
    request_body = UserUpdateParams,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Unknown role", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub(crate) async fn update_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(username): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params: UserUpdateParams = decode_body(&body, &UPDATE_FIELDS)?;
    Ok(respond(
        state.engine.update_user(&caller, &username, params).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/users/{username}",
    tag = "users",
    params(("username" = String, Path, description = "User name")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_user(
    State(state): State<AppState>,
    caller: Caller,
    Path(username): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.delete_user(&caller, &username).await?))
}
