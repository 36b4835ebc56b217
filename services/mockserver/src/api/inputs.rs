//! Input handlers.
use crate::api::error::ApiError;
use crate::api::{decode_body, respond};
use crate::app::AppState;
use crate::auth::Caller;
use crate::validate::FieldSpec;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Response;
use glmock_model::{ErrorResponse, Input, InputUpdateParams, InputsBody};

const INPUT_FIELDS: FieldSpec = FieldSpec {
    required: &["title", "type"],
    optional: &["attributes", "global", "node", "index_set_id"],
    ignored: &["id", "creator_user_id", "created_at"],
    reject_unknown: true,
};

#[utoipa::path(
    get,
    path = "/api/system/inputs",
    tag = "inputs",
    responses((status = 200, description = "List inputs", body = InputsBody))
)]
pub(crate) async fn list_inputs(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.list_inputs(&caller).await?))
}

#[utoipa::path(
    post,
    path = "/api/system/inputs",
    tag = "inputs",
    request_body = Input,
    responses(
        (status = 200, description = "Input created", body = Input),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub(crate) async fn create_input(
    State(state): State<AppState>,
    caller: Caller,
    body: Bytes,
) -> Result<Response, ApiError> {
    let input: Input = decode_body(&body, &INPUT_FIELDS)?;
    Ok(respond(state.engine.create_input(&caller, input).await?))
}

#[utoipa::path(
    get,
    path = "/api/system/inputs/{input_id}",
    tag = "inputs",
    params(("input_id" = String, Path, description = "Input id")),
    responses(
        (status = 200, description = "Input", body = Input),
        (status = 404, description = "Input not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_input(
    State(state): State<AppState>,
    caller: Caller,
    Path(input_id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.get_input(&caller, &input_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/system/inputs/{input_id}",
    tag = "inputs",
    params(("input_id" = String, Path, description = "Input id")),
    request_body = InputUpdateParams,
    responses(
        (status = 204, description = "Input updated"),
        (status = 404, description = "Input not found", body = ErrorResponse)
    )
)]
pub(crate) async fn update_input(
    State(state): State<AppState>,
    caller: Caller,
    Path(input_id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params: InputUpdateParams = decode_body(&body, &INPUT_FIELDS)?;
    Ok(respond(
        state.engine.update_input(&caller, &input_id, params).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/system/inputs/{input_id}",
    tag = "inputs",
    params(("input_id" = String, Path, description = "Input id")),
    responses(
        (status = 204, description = "Input terminated"),
        (status = 404, description = "Input not found", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_input(
    State(state): State<AppState>,
    caller: Caller,
    Path(input_id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.delete_input(&caller, &input_id).await?))
}
