//! List and error bodies exchanged over HTTP.
use crate::{IndexSet, IndexSetStats, Input, Role, User};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct RolesBody {
    pub roles: Vec<Role>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct UsersBody {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct RoleMembersBody {
    pub role: String,
    pub users: Vec<User>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct InputsBody {
    pub inputs: Vec<Input>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default)]
pub struct IndexSetsBody {
    pub index_sets: Vec<IndexSet>,
    pub total: usize,
    /// Per index set statistics keyed by id; present only when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<BTreeMap<String, IndexSetStats>>,
}

/// Error envelope returned with every non-2xx response.
///
/// `status` repeats the HTTP status code; `code` is a stable machine-readable
/// category (`validation_error`, `forbidden`, ...).
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub code: String,
    pub message: String,
}
