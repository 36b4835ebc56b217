//! The authorization check run first by every engine operation.
use crate::auth::{AuthzError, Caller, Principal};
use crate::store::MockStore;

#[derive(Debug, Clone, Copy)]
pub struct Gate {
    auth_enabled: bool,
}

impl Gate {
    pub fn new(auth_enabled: bool) -> Self {
        Self { auth_enabled }
    }

    pub fn auth_enabled(&self) -> bool {
        self.auth_enabled
    }

    /// Allow or deny `caller` for `permission`, optionally scoped to `target`.
    ///
    /// Returns the resolved principal when authentication is enabled and
    /// `None` when it is disabled (every call allowed, nobody resolved).
    pub async fn authorize(
        &self,
        store: &MockStore,
        caller: &Caller,
        permission: &str,
        target: Option<&str>,
    ) -> Result<Option<Principal>, AuthzError> {
        if !self.auth_enabled {
            return Ok(None);
        }
        let username = caller
            .username()
            .ok_or_else(|| AuthzError::Unauthorized("authentication required".to_string()))?;
        let principal = Principal::resolve(store, username).await.ok_or_else(|| {
            AuthzError::Unauthorized(format!("user <{username}> is not authenticated"))
        })?;
        if !principal.user.enabled {
            return Err(AuthzError::Unauthorized(format!(
                "user <{username}> is disabled"
            )));
        }
        if !principal.allows(permission, target) {
            tracing::debug!(
                user = %username,
                permission,
                target = target.unwrap_or(""),
                "permission denied"
            );
            let scope = target.map(|t| format!(" on <{t}>")).unwrap_or_default();
            return Err(AuthzError::Forbidden(format!(
                "user <{username}> lacks permission {permission}{scope}"
            )));
        }
        Ok(Some(principal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glmock_model::{Role, User};

    async fn store_with_reader() -> MockStore {
        let store = MockStore::new();
        store
            .roles
            .add(Role::new("Reader", vec!["roles:read".to_string()]))
            .await
            .expect("role");
        store
            .users
            .add(User::new("reader").with_roles(["Reader"]))
            .await
            .expect("user");
        store
    }

    #[tokio::test]
    async fn anonymous_and_unknown_callers_are_unauthorized() {
        let store = store_with_reader().await;
        let gate = Gate::new(true);
        let err = gate
            .authorize(&store, &Caller::Anonymous, "roles:read", None)
            .await
            .expect_err("anonymous");
        assert!(matches!(err, AuthzError::Unauthorized(_)));
        let err = gate
            .authorize(&store, &Caller::user("ghost"), "roles:read", None)
            .await
            .expect_err("unknown");
        assert!(matches!(err, AuthzError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn missing_permission_is_forbidden() {
        let store = store_with_reader().await;
        let gate = Gate::new(true);
        let principal = gate
            .authorize(&store, &Caller::user("reader"), "roles:read", Some("Admin"))
            .await
            .expect("allowed")
            .expect("principal");
        assert_eq!(principal.username(), "reader");

        let err = gate
            .authorize(&store, &Caller::user("reader"), "roles:create", None)
            .await
            .expect_err("forbidden");
        assert!(matches!(err, AuthzError::Forbidden(_)));
    }

    #[tokio::test]
    async fn role_edits_apply_to_the_next_check() {
        let store = store_with_reader().await;
        let gate = Gate::new(true);
        let caller = Caller::user("reader");
        assert!(
            gate.authorize(&store, &caller, "roles:create", None)
                .await
                .is_err()
        );
        let reader = store.roles.get_by_key("Reader").await.expect("role");
        store
            .roles
            .update_with(&reader.id, |role| role.permissions.push("roles:create".into()))
            .await
            .expect("update");
        assert!(
            gate.authorize(&store, &caller, "roles:create", None)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn disabled_users_are_unauthorized() {
        let store = store_with_reader().await;
        let reader = store.users.get_by_key("reader").await.expect("user");
        store
            .users
            .update_with(&reader.id, |user| user.enabled = false)
            .await
            .expect("disable");
        let err = Gate::new(true)
            .authorize(&store, &Caller::user("reader"), "roles:read", None)
            .await
            .expect_err("disabled");
        assert!(matches!(err, AuthzError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn disabled_auth_allows_everyone() {
        let store = MockStore::new();
        let access = Gate::new(false)
            .authorize(&store, &Caller::Anonymous, "roles:delete", Some("Admin"))
            .await
            .expect("allowed");
        assert!(access.is_none());
    }
}
