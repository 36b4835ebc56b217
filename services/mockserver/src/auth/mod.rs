//! Authorization gate.
//!
//! # Purpose
//! Resolves the calling user into a [`Principal`] (their roles' permissions
//! plus direct grants, computed fresh on every call) and checks a required
//! permission string against it.
//!
//! # Key invariants
//! - Nothing is cached: a role edit is visible to the very next check.
//! - An unknown or anonymous caller is `Unauthorized`; a known caller lacking
//!   the permission is `Forbidden`.
pub mod errors;
pub mod gate;
pub mod permission;
pub mod principal;

pub use errors::AuthzError;
pub use gate::Gate;
pub use permission::{PermissionSet, permission_implies, wildcard_match};
pub use principal::{Caller, Principal};
