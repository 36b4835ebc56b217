//! Index set and index set statistics handlers.
use crate::api::error::ApiError;
use crate::api::{decode_body, respond};
use crate::app::AppState;
use crate::auth::Caller;
use crate::validate::FieldSpec;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use glmock_model::{ErrorResponse, IndexSet, IndexSetStats, IndexSetUpdateParams, IndexSetsBody};
use serde::Deserialize;
use utoipa::IntoParams;

const SETTINGS_FIELDS: &[&str] = &[
    "description",
    "shards",
    "replicas",
    "rotation_strategy_class",
    "rotation_strategy",
    "retention_strategy_class",
    "retention_strategy",
    "index_analyzer",
    "index_optimization_max_num_segments",
    "index_optimization_disabled",
    "writable",
];

const CREATE_FIELDS: FieldSpec = FieldSpec {
    required: &["title", "index_prefix"],
    optional: SETTINGS_FIELDS,
    ignored: &["id", "default", "creation_date"],
    reject_unknown: true,
};

const UPDATE_FIELDS: FieldSpec = FieldSpec {
    required: &[],
    optional: &[
        "title",
        "description",
        "shards",
        "replicas",
        "rotation_strategy_class",
        "rotation_strategy",
        "retention_strategy_class",
        "retention_strategy",
        "index_analyzer",
        "index_optimization_max_num_segments",
        "index_optimization_disabled",
        "writable",
    ],
    ignored: &["id", "index_prefix", "default", "creation_date"],
    reject_unknown: true,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct ListIndexSetsQuery {
    /// Include per-set statistics keyed by index set id.
    #[serde(default)]
    stats: bool,
}

#[utoipa::path(
    get,
    path = "/api/system/indices/index_sets",
    tag = "index_sets",
    params(ListIndexSetsQuery),
    responses((status = 200, description = "List index sets", body = IndexSetsBody))
)]
pub(crate) async fn list_index_sets(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ListIndexSetsQuery>,
) -> Result<Response, ApiError> {
    Ok(respond(
        state.engine.list_index_sets(&caller, query.stats).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/system/indices/index_sets",
    tag = "index_sets",
    request_body = IndexSet,
    responses(
        (status = 200, description = "Index set created", body = IndexSet),
        (status = 400, description = "Invalid index set", body = ErrorResponse),
        (status = 409, description = "Prefix taken", body = ErrorResponse)
    )
)]
pub(crate) async fn create_index_set(
    State(state): State<AppState>,
    caller: Caller,
    body: Bytes,
) -> Result<Response, ApiError> {
    let index_set: IndexSet = decode_body(&body, &CREATE_FIELDS)?;
    Ok(respond(
        state.engine.create_index_set(&caller, index_set).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/system/indices/index_sets/{index_set_id}",
    tag = "index_sets",
    params(("index_set_id" = String, Path, description = "Index set id")),
    responses(
        (status = 200, description = "Index set", body = IndexSet),
        (status = 404, description = "Index set not found", body = ErrorResponse)
    )
)]
pub(crate) async fn get_index_set(
    State(state): State<AppState>,
    caller: Caller,
    Path(index_set_id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(
        state.engine.get_index_set(&caller, &index_set_id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/system/indices/index_sets/{index_set_id}",
    tag = "index_sets",
    params(("index_set_id" = String, Path, description = "Index set id")),
    request_body = IndexSetUpdateParams,
    responses(
        (status = 204, description = "Index set updated"),
        (status = 400, description = "Invalid settings", body = ErrorResponse),
        (status = 404, description = "Index set not found", body = ErrorResponse)
    )
)]
pub(crate) async fn update_index_set(
    State(state): State<AppState>,
    caller: Caller,
    Path(index_set_id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params: IndexSetUpdateParams = decode_body(&body, &UPDATE_FIELDS)?;
    Ok(respond(
        state
            .engine
            .update_index_set(&caller, &index_set_id, params)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/system/indices/index_sets/{index_set_id}",
    tag = "index_sets",
    params(("index_set_id" = String, Path, description = "Index set id")),
    responses(
        (status = 204, description = "Index set deleted"),
        (status = 400, description = "Default index set", body = ErrorResponse),
        (status = 404, description = "Index set not found", body = ErrorResponse)
    )
)]
pub(crate) async fn delete_index_set(
    State(state): State<AppState>,
    caller: Caller,
    Path(index_set_id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(
        state.engine.delete_index_set(&caller, &index_set_id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/system/indices/index_sets/{index_set_id}/default",
    tag = "index_sets",
    params(("index_set_id" = String, Path, description = "Index set id")),
    responses(
        (status = 200, description = "New default index set", body = IndexSet),
        (status = 400, description = "Index set not writable", body = ErrorResponse),
        (status = 404, description = "Index set not found", body = ErrorResponse)
    )
)]
pub(crate) async fn set_default_index_set(
    State(state): State<AppState>,
    caller: Caller,
    Path(index_set_id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(
        state
            .engine
            .set_default_index_set(&caller, &index_set_id)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/system/indices/index_sets/{index_set_id}/stats",
    tag = "index_sets",
    params(("index_set_id" = String, Path, description = "Index set id")),
    responses(
        (status = 200, description = "Index set statistics", body = IndexSetStats),
        (status = 404, description = "Index set not found", body = ErrorResponse)
    )
)]
pub(crate) async fn index_set_stats(
    State(state): State<AppState>,
    caller: Caller,
    Path(index_set_id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(respond(
        state.engine.index_set_stats(&caller, &index_set_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/system/indices/index_sets/stats",
    tag = "index_sets",
    responses((status = 200, description = "Statistics over all index sets", body = IndexSetStats))
)]
pub(crate) async fn total_index_set_stats(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Response, ApiError> {
    Ok(respond(state.engine.total_index_set_stats(&caller).await?))
}
