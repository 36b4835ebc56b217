//! Caller identity and resolved principal.
use crate::auth::PermissionSet;
use crate::store::MockStore;
use glmock_model::User;

/// Who is calling, as reported by the transport. Credentials are not checked;
/// the transport only extracts a user name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User(String),
}

impl Caller {
    pub fn user(name: impl Into<String>) -> Self {
        Caller::User(name.into())
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Caller::Anonymous => None,
            Caller::User(name) => Some(name),
        }
    }
}

/// The caller resolved against the store for one operation.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
    pub permissions: PermissionSet,
}

impl Principal {
    /// Look up `username` and union the permissions of its current roles with
    /// its direct grants. Role names that no longer resolve contribute nothing.
    pub async fn resolve(store: &MockStore, username: &str) -> Option<Self> {
        let user = store.users.get_by_key(username).await?;
        let mut permissions = PermissionSet::new();
        permissions.extend(user.permissions.iter().cloned());
        for role_name in &user.roles {
            if let Some(role) = store.roles.get_by_key(role_name).await {
                permissions.extend(role.permissions);
            }
        }
        Some(Self { user, permissions })
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn allows(&self, permission: &str, target: Option<&str>) -> bool {
        self.permissions.allows(permission, target)
    }
}
