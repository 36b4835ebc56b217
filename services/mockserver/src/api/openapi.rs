//! OpenAPI schema aggregation for the mock API.
//!
//! Served as JSON at `/api/openapi.json`.
use crate::api::{index_sets, inputs, roles, users};
use glmock_model::{
    ErrorResponse, IndexSet, IndexSetStats, IndexSetUpdateParams, IndexSetsBody, Input,
    InputUpdateParams, InputsBody, Role, RoleMembersBody, RoleUpdateParams, RolesBody, User,
    UserUpdateParams, UsersBody,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "glmock",
        version = "v1",
        description = "Mock of the log-management REST API"
    ),
    paths(
        roles::list_roles,
        roles::create_role,
        roles::get_role,
        roles::update_role,
        roles::delete_role,
        roles::role_members,
        roles::add_role_member,
        roles::remove_role_member,
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        inputs::list_inputs,
        inputs::create_input,
        inputs::get_input,
        inputs::update_input,
        inputs::delete_input,
        index_sets::list_index_sets,
        index_sets::create_index_set,
        index_sets::get_index_set,
        index_sets::update_index_set,
        index_sets::delete_index_set,
        index_sets::set_default_index_set,
        index_sets::index_set_stats,
        index_sets::total_index_set_stats,
    ),
    components(schemas(
        ErrorResponse,
        Role,
        RoleUpdateParams,
        RolesBody,
        RoleMembersBody,
        User,
        UserUpdateParams,
        UsersBody,
        Input,
        InputUpdateParams,
        InputsBody,
        IndexSet,
        IndexSetUpdateParams,
        IndexSetStats,
        IndexSetsBody,
    )),
    tags(
        (name = "roles", description = "Roles and role membership"),
        (name = "users", description = "User accounts"),
        (name = "inputs", description = "Message inputs"),
        (name = "index_sets", description = "Index sets and their statistics")
    )
)]
pub struct ApiDoc;

pub(crate) async fn openapi_json() -> axum::Json<utoipa::openapi::OpenApi> {
    axum::Json(ApiDoc::openapi())
}
