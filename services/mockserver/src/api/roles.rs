//! Role and role-membership handlers.
use crate::api::error::ApiError;
use crate::api::{decode_body, respond};
use crate::app::AppState;
use crate::auth::Caller;
use crate::validate::FieldSpec;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Response;
use glmock_model::{ErrorResponse, Role, RoleMembersBody, RoleUpdateParams, RolesBody};

const ROLE_FIELDS: FieldSpec = FieldSpec {
    required: &["name", "permissions"],
    optional: &["description"],
    ignored: &["id", "read_only", "created_at"],
    reject_unknown: true,
};

#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "roles",
    responses(
        (status = 200, description = "List roles", body = RolesBody),
        (status = 403, description = "Missing roles:read", body = ErrorResponse)
    )
)]
pub(crate) async fn list_roles(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.list_roles(&caller).await?))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "roles",
    request_body = Role,
    responses(
        (status = 200, description = "Role created", body = Role),
        (status = 400, description = "Invalid role", body = ErrorResponse),
        (status = 409, description = "Role name taken", body = ErrorResponse)
    )
)]
pub(crate) async fn create_role(
    State(state): State<AppState>,
    caller: Caller,
    body: Bytes,
) -> Result<Response, ApiError> {
    let role: Role = decode_body(&body, &ROLE_FIELDS)?;
    Ok(respond(state.engine.create_role(&caller, role).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/{rolename}",
    tag = "roles",
    params(("rolename" = String, Path, description = "Role name")),
    responses(
        (status = 200, description = "Role", body = Role),
        (status = 404, description = "Role not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_role(
    State(state): State<AppState>,
    caller: Caller,
    Path(rolename): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.get_role(&caller, &rolename).await?))
}

#[utoipa::path(
    put,
    path = "/api/roles/{rolename}",
    tag = "roles",
    params(("rolename" = String, Path, description = "Role name")),
    request_body = RoleUpdateParams,
    responses(
        (status = 204, description = "Role updated"),
        (status = 400, description = "Invalid or read-only role", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse),
        (status = 409, description = "New name taken", body = ErrorResponse)
    )
)]
pub(crate) async fn update_role(
    State(state): State<AppState>,
    caller: Caller,
    Path(rolename): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params: RoleUpdateParams = decode_body(&body, &ROLE_FIELDS)?;
    Ok(respond(
        state.engine.update_role(&caller, &rolename, params).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{rolename}",
    tag = "roles",
    params(("rolename" = String, Path, description = "Role name")),
    responses(
        (status = 204, description = "Role deleted and users dissociated"),
        (status = 400, description = "Read-only role", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_role(
    State(state): State<AppState>,
    caller: Caller,
    Path(rolename): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.delete_role(&caller, &rolename).await?))
}

#[utoipa::path(
    get,
    path = "/api/roles/{rolename}/members",
    tag = "roles",
    params(("rolename" = String, Path, description = "Role name")),
    responses(
        (status = 200, description = "Users holding the role", body = RoleMembersBody),
        (status = 404, description = "Role not found", body = ErrorResponse)
    )
)]
pub(crate) async fn role_members(
    State(state): State<AppState>,
    caller: Caller,
    Path(rolename): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.role_members(&caller, &rolename).await?))
}

#[utoipa::path(
    put,
    path = "/api/roles/{rolename}/members/{username}",
    tag = "roles",
    params(
        ("rolename" = String, Path, description = "Role name"),
        ("username" = String, Path, description = "User name")
    ),
    responses(
        (status = 204, description = "Member added"),
        (status = 404, description = "Role or user not found", body = ErrorResponse)
    )
)]
pub(crate) async fn add_role_member(
    State(state): State<AppState>,
    caller: Caller,
    Path((rolename, username)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    Ok(respond(
        state
            .engine
            .add_role_member(&caller, &rolename, &username)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{rolename}/members/{username}",
    tag = "roles",
    params(
        ("rolename" = String, Path, description = "Role name"),
        ("username" = String, Path, description = "User name")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 404, description = "Role or user not found", body = ErrorResponse)
    )
)]
pub(crate) async fn remove_role_member(
    State(state): State<AppState>,
    caller: Caller,
    Path((rolename, username)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    Ok(respond(
        state
            .engine
            .remove_role_member(&caller, &rolename, &username)
            .await?,
    ))
}
