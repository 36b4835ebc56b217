//! Shared glmock data model.
//!
//! # Purpose
//! Defines the entity records (roles, users, inputs, index sets), their update
//! parameter variants, and the list/error bodies exchanged over HTTP. Both the
//! mock server and the typed client depend on these shapes so the wire format
//! is defined exactly once.
//!
//! # Key invariants
//! - Every entity carries an opaque string `id`; an empty id means "not yet
//!   assigned" and is filled in by the store on create.
//! - Update parameter types never carry `id` or `created_at`, so an update can
//!   not rewrite either.
pub mod body;
pub mod ids;
mod index_set;
mod input;
mod role;
mod user;

pub use body::{
    ErrorResponse, IndexSetsBody, InputsBody, RoleMembersBody, RolesBody, UsersBody,
};
pub use ids::new_object_id;
pub use index_set::{IndexSet, IndexSetStats, IndexSetUpdateParams};
pub use input::{Input, InputUpdateParams};
pub use role::{Role, RoleUpdateParams};
pub use user::{User, UserUpdateParams};
