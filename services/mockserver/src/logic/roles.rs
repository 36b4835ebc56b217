//! Role operations, including membership.
use super::{Engine, LogicError, LogicResult, Reply, integrity, observe, require_target_name};
use crate::auth::Caller;
use crate::store::StoreError;
use glmock_model::{Role, RoleMembersBody, RoleUpdateParams, RolesBody, User};

impl Engine {
    pub async fn list_roles(&self, caller: &Caller) -> LogicResult<RolesBody> {
        observe("list_roles", async {
            self.authorize(caller, "roles:read", None).await?;
            let _guard = self.read_guard().await;
            let mut roles = self.store.roles.list().await;
            roles.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(Reply::ok(RolesBody {
                total: roles.len(),
                roles,
            }))
        })
        .await
    }

    pub async fn get_role(&self, caller: &Caller, name: &str) -> LogicResult<Role> {
        observe("get_role", async {
            self.authorize(caller, "roles:read", Some(name)).await?;
            let _guard = self.read_guard().await;
            Ok(Reply::ok(self.find_role(name).await?))
        })
        .await
    }

    pub async fn create_role(&self, caller: &Caller, mut role: Role) -> LogicResult<Role> {
        observe("create_role", async {
            self.authorize(caller, "roles:create", None).await?;
            validate_role(&role.name, &role.permissions)?;
            let _guard = self.write_guard().await;
            role.id.clear();
            role.read_only = false;
            let name = role.name.clone();
            let stored = self.store.roles.add(role).await.map_err(|err| match err {
                StoreError::Conflict(_) => {
                    LogicError::Conflict(format!("role <{name}> already exists"))
                }
                other => other.into(),
            })?;
            self.save().await?;
            tracing::info!(rolename = %stored.name, "role created");
            Ok(Reply::ok(stored))
        })
        .await
    }

    pub async fn update_role(
        &self,
        caller: &Caller,
        name: &str,
        params: RoleUpdateParams,
    ) -> LogicResult<Role> {
        observe("update_role", async {
            self.authorize(caller, "roles:edit", Some(name)).await?;
            validate_role(&params.name, &params.permissions)?;
            let _guard = self.write_guard().await;
            let role = self.find_role(name).await?;
            if role.read_only {
                return Err(LogicError::Validation(format!(
                    "cannot update read only role <{name}>"
                )));
            }
            let updated = self.store.roles.update(&role.id, params).await?;
            if updated.name != role.name {
                integrity::rename_role_references(&self.store, &role.name, &updated.name).await?;
            }
            self.save().await?;
            tracing::info!(rolename = %name, new_name = %updated.name, "role updated");
            Ok(Reply::no_content())
        })
        .await
    }

    /// Remove the role and dissociate every user from it.
    pub async fn delete_role(&self, caller: &Caller, name: &str) -> LogicResult<()> {
        observe("delete_role", async {
            self.authorize(caller, "roles:delete", Some(name)).await?;
            let _guard = self.write_guard().await;
            let role = self.find_role(name).await?;
            if role.read_only {
                return Err(LogicError::Validation(format!(
                    "cannot delete read only role <{name}>"
                )));
            }
            self.store.roles.delete(&role.id).await;
            integrity::dissociate_role(&self.store, name).await?;
            self.save().await?;
            tracing::info!(rolename = %name, "role deleted");
            Ok(Reply::no_content())
        })
        .await
    }

    pub async fn role_members(&self, caller: &Caller, name: &str) -> LogicResult<RoleMembersBody> {
        observe("role_members", async {
            self.authorize(caller, "roles:read", Some(name)).await?;
            let _guard = self.read_guard().await;
            let role = self.find_role(name).await?;
            let mut users: Vec<User> = self
                .store
                .users
                .list()
                .await
                .into_iter()
                .filter(|user| user.has_role(&role.name))
                .map(User::redacted)
                .collect();
            users.sort_by(|a, b| a.username.cmp(&b.username));
            Ok(Reply::ok(RoleMembersBody {
                role: role.name,
                users,
            }))
        })
        .await
    }

    pub async fn add_role_member(
        &self,
        caller: &Caller,
        name: &str,
        username: &str,
    ) -> LogicResult<()> {
        observe("add_role_member", async {
            self.set_membership(caller, name, username, true).await
        })
        .await
    }

    pub async fn remove_role_member(
        &self,
        caller: &Caller,
        name: &str,
        username: &str,
    ) -> LogicResult<()> {
        observe("remove_role_member", async {
            self.set_membership(caller, name, username, false).await
        })
        .await
    }

    async fn set_membership(
        &self,
        caller: &Caller,
        name: &str,
        username: &str,
        member: bool,
    ) -> LogicResult<()> {
        self.authorize(caller, "roles:edit", Some(name)).await?;
        let _guard = self.write_guard().await;
        let role = self.find_role(name).await?;
        let user = self.find_user(username).await?;
        self.store
            .users
            .update_with(&user.id, |user| {
                if member {
                    user.roles.insert(role.name.clone());
                } else {
                    user.roles.remove(&role.name);
                }
            })
            .await?;
        self.save().await?;
        tracing::info!(rolename = %name, username = %username, member, "role membership changed");
        Ok(Reply::no_content())
    }

    pub(super) async fn find_role(&self, name: &str) -> Result<Role, LogicError> {
        self.store
            .roles
            .get_by_key(name)
            .await
            .ok_or_else(|| LogicError::NotFound(format!("no role found with name <{name}>")))
    }
}

fn validate_role(name: &str, permissions: &[String]) -> Result<(), LogicError> {
    require_target_name(name, "role name")?;
    if permissions.is_empty() {
        return Err(LogicError::Validation(
            "role permissions are required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::{ADMIN_ROLE, READER_ROLE};
    use super::*;
    use axum::http::StatusCode;
    use glmock_model::UserUpdateParams;

    fn ops_role() -> Role {
        Role::new("Ops", vec!["inputs:*".to_string()])
    }

    #[tokio::test]
    async fn create_then_get_role() {
        let engine = seeded_engine().await;
        let created = engine.create_role(&admin(), ops_role()).await.expect("create");
        assert_eq!(created.status, StatusCode::OK);
        let stored = created.body.expect("body");
        assert!(!stored.id.is_empty());

        let fetched = engine.get_role(&admin(), "Ops").await.expect("get");
        assert_eq!(fetched.body, Some(stored));

        let listed = engine.list_roles(&admin()).await.expect("list");
        let body = listed.body.expect("body");
        assert_eq!(body.total, 3);
        assert_eq!(
            body.roles.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec![ADMIN_ROLE, "Ops", READER_ROLE]
        );
    }

    #[tokio::test]
    async fn create_role_validates_and_rejects_duplicates() {
        let engine = seeded_engine().await;
        let err = engine
            .create_role(&admin(), Role::new("", vec!["*".to_string()]))
            .await
            .expect_err("empty name");
        assert!(matches!(err, LogicError::Validation(_)));
        let err = engine
            .create_role(&admin(), Role::new("Ops", Vec::new()))
            .await
            .expect_err("no permissions");
        assert!(matches!(err, LogicError::Validation(_)));
        let err = engine
            .create_role(&admin(), Role::new("Ops:East", vec!["*".to_string()]))
            .await
            .expect_err("colon in name");
        assert!(matches!(err, LogicError::Validation(_)));

        engine.create_role(&admin(), ops_role()).await.expect("first");
        let err = engine
            .create_role(&admin(), ops_role())
            .await
            .expect_err("duplicate");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(engine.store().roles.len().await, 3);
    }

    #[tokio::test]
    async fn get_missing_role_is_not_found() {
        let engine = seeded_engine().await;
        let err = engine.get_role(&admin(), "Nope").await.expect_err("missing");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn read_only_roles_can_not_change() {
        let engine = seeded_engine().await;
        let err = engine
            .delete_role(&admin(), ADMIN_ROLE)
            .await
            .expect_err("read only");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = engine
            .update_role(&admin(), READER_ROLE, RoleUpdateParams::from(&ops_role()))
            .await
            .expect_err("read only");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rename_rewrites_members_and_rejects_collisions() {
        let engine = seeded_engine().await;
        engine.create_role(&admin(), ops_role()).await.expect("ops");
        engine
            .add_role_member(&admin(), "Ops", "admin")
            .await
            .expect("member");

        let mut params = RoleUpdateParams::from(&ops_role());
        params.name = READER_ROLE.to_string();
        let err = engine
            .update_role(&admin(), "Ops", params)
            .await
            .expect_err("collision");
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let mut params = RoleUpdateParams::from(&ops_role());
        params.name = "Ops:Renamed".to_string();
        let err = engine
            .update_role(&admin(), "Ops", params)
            .await
            .expect_err("colon in new name");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let mut params = RoleUpdateParams::from(&ops_role());
        params.name = "Operators".to_string();
        let reply = engine
            .update_role(&admin(), "Ops", params)
            .await
            .expect("rename");
        assert_eq!(reply.status, StatusCode::NO_CONTENT);
        assert!(reply.body.is_none());

        let admin_user = engine.store().users.get_by_key("admin").await.expect("admin");
        assert!(admin_user.has_role("Operators"));
        assert!(!admin_user.has_role("Ops"));
    }

    #[tokio::test]
    async fn delete_role_dissociates_users() {
        let engine = seeded_engine().await;
        engine.create_role(&admin(), ops_role()).await.expect("ops");
        engine
            .create_user(&admin(), User::new("alice").with_roles(["Ops", READER_ROLE]))
            .await
            .expect("alice");

        let reply = engine.delete_role(&admin(), "Ops").await.expect("delete");
        assert_eq!(reply.status, StatusCode::NO_CONTENT);
        let alice = engine.store().users.get_by_key("alice").await.expect("alice");
        assert!(!alice.has_role("Ops"));
        assert!(alice.has_role(READER_ROLE));

        let err = engine.delete_role(&admin(), "Ops").await.expect_err("gone");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn membership_round_trip() {
        let engine = seeded_engine().await;
        engine
            .create_user(&admin(), User::new("bob"))
            .await
            .expect("bob");
        engine
            .add_role_member(&admin(), READER_ROLE, "bob")
            .await
            .expect("add");
        let members = engine
            .role_members(&admin(), READER_ROLE)
            .await
            .expect("members")
            .body
            .expect("body");
        assert_eq!(members.users.len(), 1);
        assert_eq!(members.users[0].username, "bob");

        engine
            .remove_role_member(&admin(), READER_ROLE, "bob")
            .await
            .expect("remove");
        let bob = engine.store().users.get_by_key("bob").await.expect("bob");
        assert!(bob.roles.is_empty());

        let err = engine
            .add_role_member(&admin(), READER_ROLE, "ghost")
            .await
            .expect_err("missing user");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = engine
            .add_role_member(&admin(), "Ghosts", "bob")
            .await
            .expect_err("missing role");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn role_edits_change_access_on_the_next_call() {
        let engine = seeded_engine().await;
        engine.create_role(&admin(), ops_role()).await.expect("ops");
        engine
            .create_user(&admin(), User::new("carol").with_roles(["Ops"]))
            .await
            .expect("carol");
        let carol = Caller::user("carol");
        let err = engine.list_roles(&carol).await.expect_err("no access");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);

        engine
            .update_user(
                &admin(),
                "carol",
                UserUpdateParams {
                    permissions: Some(vec!["roles:read".to_string()]),
                    ..UserUpdateParams::default()
                },
            )
            .await
            .expect("grant");
        engine.list_roles(&carol).await.expect("allowed now");
    }
}
