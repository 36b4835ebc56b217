//! In-memory collection store.
//!
//! # Purpose
//! Holds one independently locked table per resource kind and the traits that
//! let the generic [`Collection`] treat every entity the same way.
//!
//! # Consistency
//! Each collection is atomic on its own. Nothing here coordinates across
//! collections; cross-collection rules live in `logic::integrity`.
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod collection;
pub mod memory;
mod records;

pub use collection::Collection;
pub use memory::{MockStore, StoreSnapshot};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// An entity that can live in a [`Collection`].
pub trait Record: Clone + Send + Sync + 'static {
    /// Collection name used in errors, logs and metrics labels.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Secondary key that must be unique within the collection, if any.
    fn unique_key(&self) -> Option<&str> {
        None
    }

    /// Record the creation time. Called exactly once, by `Collection::add`.
    fn stamp_created(&mut self, at: DateTime<Utc>);
}

/// Update parameters applicable to a stored record of type `T`.
///
/// Implementations only touch mutable fields; id and creation time are not
/// reachable through a patch.
pub trait Patch<T> {
    fn apply(self, record: &mut T);
}
