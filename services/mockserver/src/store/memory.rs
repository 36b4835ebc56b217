//! The mock's full in-memory state.
//!
//! # Purpose
//! `MockStore` owns one [`Collection`] per resource kind. It is an ordinary
//! value: construct it, wrap it in an `Arc`, and hand it to an engine. Several
//! stores can coexist in one process (tests rely on this).
//!
//! # Durability
//! Not durable by itself. [`MockStore::snapshot`] produces a serializable copy
//! of all collections which a persister writes out; [`MockStore::from_snapshot`]
//! rebuilds a store from such a copy.
use super::{Collection, StoreResult};
use glmock_model::{IndexSet, Input, Role, User};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub struct MockStore {
    pub roles: Collection<Role>,
    pub users: Collection<User>,
    pub inputs: Collection<Input>,
    pub index_sets: Collection<IndexSet>,
}

/// Point-in-time copy of every collection, as written by persisters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub roles: Vec<Role>,
    pub users: Vec<User>,
    pub inputs: Vec<Input>,
    pub index_sets: Vec<IndexSet>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> StoreResult<Self> {
        Ok(Self {
            roles: Collection::from_records(snapshot.roles)?,
            users: Collection::from_records(snapshot.users)?,
            inputs: Collection::from_records(snapshot.inputs)?,
            index_sets: Collection::from_records(snapshot.index_sets)?,
        })
    }

    /// Copy every collection. Each collection is read under its own lock, so
    /// the copy is per-collection consistent only.
    pub async fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            roles: self.roles.list().await,
            users: self.users.list().await,
            inputs: self.inputs.list().await,
            index_sets: self.index_sets.list().await,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.roles.is_dirty()
            || self.users.is_dirty()
            || self.inputs.is_dirty()
            || self.index_sets.is_dirty()
    }

    /// Clear every dirty flag, returning which ones were set
    /// (roles, users, inputs, index sets).
    pub(crate) fn take_dirty(&self) -> [bool; 4] {
        [
            self.roles.take_dirty(),
            self.users.take_dirty(),
            self.inputs.take_dirty(),
            self.index_sets.take_dirty(),
        ]
    }

    /// Restore flags cleared by [`MockStore::take_dirty`] after a failed save.
    pub(crate) fn restore_dirty(&self, flags: [bool; 4]) {
        let [roles, users, inputs, index_sets] = flags;
        if roles {
            self.roles.mark_dirty();
        }
        if users {
            self.users.mark_dirty();
        }
        if inputs {
            self.inputs.mark_dirty();
        }
        if index_sets {
            self.index_sets.mark_dirty();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_round_trips_through_from_snapshot() {
        let store = MockStore::new();
        let role = store
            .roles
            .add(Role::new("Reader", vec!["users:list".to_string()]))
            .await
            .expect("role");
        store
            .users
            .add(User::new("alice").with_roles(["Reader"]))
            .await
            .expect("user");
        assert!(store.is_dirty());

        let snapshot = store.snapshot().await;
        let restored = MockStore::from_snapshot(snapshot).expect("restore");
        assert!(!restored.is_dirty());
        assert_eq!(restored.roles.get(&role.id).await, Some(role));
        let alice = restored.users.get_by_key("alice").await.expect("alice");
        assert!(alice.has_role("Reader"));
    }

    #[tokio::test]
    async fn dirty_flags_can_be_taken_and_restored() {
        let store = MockStore::new();
        store
            .inputs
            .add(Input::default())
            .await
            .expect("input");
        let flags = store.take_dirty();
        assert_eq!(flags, [false, false, true, false]);
        assert!(!store.is_dirty());
        store.restore_dirty(flags);
        assert!(store.inputs.is_dirty());
        assert!(!store.roles.is_dirty());
    }
}
