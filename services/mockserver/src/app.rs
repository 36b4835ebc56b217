//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router over the engine and defines the shared state
//! injected into handlers.
use crate::api;
use crate::logic::Engine;
use axum::Router;
use axum::routing::{get, put};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route(
            "/api/roles",
            get(api::roles::list_roles).post(api::roles::create_role),
        )
        .route(
            "/api/roles/:rolename",
            get(api::roles::get_role)
                .put(api::roles::update_role)
                .delete(api::roles::delete_role),
        )
        .route(
            "/api/roles/:rolename/members",
            get(api::roles::role_members),
        )
        .route(
            "/api/roles/:rolename/members/:username",
            put(api::roles::add_role_member).delete(api::roles::remove_role_member),
        )
        .route(
            "/api/users",
            get(api::users::list_users).post(api::users::create_user),
        )
        .route(
            "/api/users/:username",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route(
            "/api/system/inputs",
            get(api::inputs::list_inputs).post(api::inputs::create_input),
        )
        .route(
            "/api/system/inputs/:input_id",
            get(api::inputs::get_input)
                .put(api::inputs::update_input)
                .delete(api::inputs::delete_input),
        )
        .route(
            "/api/system/indices/index_sets",
            get(api::index_sets::list_index_sets).post(api::index_sets::create_index_set),
        )
        .route(
            "/api/system/indices/index_sets/stats",
            get(api::index_sets::total_index_set_stats),
        )
        .route(
            "/api/system/indices/index_sets/:index_set_id",
            get(api::index_sets::get_index_set)
                .put(api::index_sets::update_index_set)
                .delete(api::index_sets::delete_index_set),
        )
        .route(
            "/api/system/indices/index_sets/:index_set_id/stats",
            get(api::index_sets::index_set_stats),
        )
        .route(
            "/api/system/indices/index_sets/:index_set_id/default",
            put(api::index_sets::set_default_index_set),
        )
        .route("/api/openapi.json", get(api::openapi::openapi_json))
        .fallback(api::route_not_found)
        .layer(trace_layer)
        .with_state(state)
}
