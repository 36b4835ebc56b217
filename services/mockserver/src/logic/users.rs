//! User operations. Passwords are accepted but never returned.
use super::{Engine, LogicError, LogicResult, Reply, observe, require_target_name};
use crate::auth::Caller;
use crate::store::StoreError;
use glmock_model::{User, UserUpdateParams, UsersBody};

impl Engine {
    pub async fn list_users(&self, caller: &Caller) -> LogicResult<UsersBody> {
        observe("list_users", async {
            self.authorize(caller, "users:list", None).await?;
            let _guard = self.read_guard().await;
            let mut users: Vec<User> = self
                .store
                .users
                .list()
                .await
                .into_iter()
                .map(User::redacted)
                .collect();
            users.sort_by(|a, b| a.username.cmp(&b.username));
            Ok(Reply::ok(UsersBody { users }))
        })
        .await
    }

    pub async fn get_user(&self, caller: &Caller, username: &str) -> LogicResult<User> {
        observe("get_user", async {
            self.authorize(caller, "users:read", Some(username)).await?;
            let _guard = self.read_guard().await;
            Ok(Reply::ok(self.find_user(username).await?.redacted()))
        })
        .await
    }

    pub async fn create_user(&self, caller: &Caller, mut user: User) -> LogicResult<User> {
        observe("create_user", async {
            self.authorize(caller, "users:create", None).await?;
            require_target_name(&user.username, "username")?;
            let _guard = self.write_guard().await;
            self.check_roles_exist(user.roles.iter()).await?;
            user.id.clear();
            let username = user.username.clone();
            let stored = self.store.users.add(user).await.map_err(|err| match err {
                StoreError::Conflict(_) => {
                    LogicError::Conflict(format!("user <{username}> already exists"))
                }
                other => other.into(),
            })?;
            self.save().await?;
            tracing::info!(username = %stored.username, "user created");
            Ok(Reply::ok(stored.redacted()))
        })
        .await
    }

    pub async fn update_user(
        &self,
        caller: &Caller,
        username: &str,
        params: UserUpdateParams,
    ) -> LogicResult<()> {
        observe("update_user", async {
            self.authorize(caller, "users:edit", Some(username)).await?;
            let _guard = self.write_guard().await;
            if let Some(roles) = &params.roles {
                self.check_roles_exist(roles.iter()).await?;
            }
            let user = self.find_user(username).await?;
            self.store.users.update(&user.id, params).await?;
            self.save().await?;
            tracing::info!(username = %username, "user updated");
            Ok(Reply::no_content())
        })
        .await
    }

    pub async fn delete_user(&self, caller: &Caller, username: &str) -> LogicResult<()> {
        observe("delete_user", async {
            self.authorize(caller, "users:edit", Some(username)).await?;
            let _guard = self.write_guard().await;
            let user = self.find_user(username).await?;
            self.store.users.delete(&user.id).await;
            self.save().await?;
            tracing::info!(username = %username, "user deleted");
            Ok(Reply::no_content())
        })
        .await
    }

    pub(super) async fn find_user(&self, username: &str) -> Result<User, LogicError> {
        self.store
            .users
            .get_by_key(username)
            .await
            .ok_or_else(|| LogicError::NotFound(format!("no user found with name <{username}>")))
    }

    async fn check_roles_exist<'a>(
        &self,
        roles: impl Iterator<Item = &'a String>,
    ) -> Result<(), LogicError> {
        for role in roles {
            if self.store.roles.get_by_key(role).await.is_none() {
                return Err(LogicError::Validation(format!("no role found with name <{role}>")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::READER_ROLE;
    use super::super::testing::*;
    use super::*;
    use axum::http::StatusCode;
    use std::collections::BTreeSet;

    fn alice() -> User {
        let mut user = User::new("alice").with_roles([READER_ROLE]);
        user.email = "alice@example.com".to_string();
        user.full_name = "Alice".to_string();
        user.password = Some("secret".to_string());
        user
    }

    #[tokio::test]
    async fn created_users_hide_passwords() {
        let engine = seeded_engine().await;
        let created = engine.create_user(&admin(), alice()).await.expect("create");
        let body = created.body.expect("body");
        assert!(body.password.is_none());
        assert_eq!(
            engine
                .store()
                .users
                .get_by_key("alice")
                .await
                .and_then(|u| u.password),
            Some("secret".to_string())
        );

        let fetched = engine.get_user(&admin(), "alice").await.expect("get");
        assert!(fetched.body.expect("body").password.is_none());
        let listed = engine.list_users(&admin()).await.expect("list");
        assert!(listed.body.expect("body").users.iter().all(|u| u.password.is_none()));
    }

    #[tokio::test]
    async fn create_user_requires_existing_roles_and_unique_name() {
        let engine = seeded_engine().await;
        let err = engine
            .create_user(&admin(), User::new("dave").with_roles(["Ghost"]))
            .await
            .expect_err("unknown role");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = engine
            .create_user(&admin(), User::new(" "))
            .await
            .expect_err("blank name");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let err = engine
            .create_user(&admin(), User::new("alice:admin"))
            .await
            .expect_err("colon in name");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(engine.store().users.get_by_key("alice:admin").await.is_none());

        engine.create_user(&admin(), alice()).await.expect("alice");
        let err = engine
            .create_user(&admin(), alice())
            .await
            .expect_err("duplicate");
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn update_user_is_partial() {
        let engine = seeded_engine().await;
        engine.create_user(&admin(), alice()).await.expect("alice");
        let reply = engine
            .update_user(
                &admin(),
                "alice",
                UserUpdateParams {
                    full_name: Some("Alice Liddell".to_string()),
                    ..UserUpdateParams::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(reply.status, StatusCode::NO_CONTENT);
        let stored = engine.store().users.get_by_key("alice").await.expect("alice");
        assert_eq!(stored.full_name, "Alice Liddell");
        assert_eq!(stored.email, "alice@example.com");
        assert!(stored.has_role(READER_ROLE));

        let err = engine
            .update_user(
                &admin(),
                "alice",
                UserUpdateParams {
                    roles: Some(BTreeSet::from(["Ghost".to_string()])),
                    ..UserUpdateParams::default()
                },
            )
            .await
            .expect_err("unknown role");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = engine
            .update_user(&admin(), "nobody", UserUpdateParams::default())
            .await
            .expect_err("missing");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_user_then_not_found() {
        let engine = seeded_engine().await;
        engine.create_user(&admin(), alice()).await.expect("alice");
        engine.delete_user(&admin(), "alice").await.expect("delete");
        let err = engine.get_user(&admin(), "alice").await.expect_err("gone");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        let err = engine.delete_user(&admin(), "alice").await.expect_err("gone");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn users_may_read_themselves_with_scoped_grant() {
        let engine = seeded_engine().await;
        let mut erin = User::new("erin");
        erin.permissions = vec!["users:read:erin".to_string()];
        engine.create_user(&admin(), erin).await.expect("erin");
        let caller = Caller::user("erin");
        engine.get_user(&caller, "erin").await.expect("self");
        let err = engine.get_user(&caller, "admin").await.expect_err("other");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
