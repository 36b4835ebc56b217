use crate::error::require_name;
use crate::{CallInfo, Client, ClientError, decode};
use glmock_model::{User, UserUpdateParams, UsersBody};
use reqwest::Method;

impl Client {
    pub async fn list_users(&self) -> Result<(Vec<User>, CallInfo), ClientError> {
        let (body, info): (UsersBody, CallInfo) = self.get_json(self.url(&["users"])).await?;
        Ok((body.users, info))
    }

    pub async fn get_user(&self, username: &str) -> Result<(User, CallInfo), ClientError> {
        require_name(username, "username")?;
        self.get_json(self.url(&["users", username])).await
    }

    /// Create `user`. The returned copy never carries the password.
    pub async fn create_user(&self, user: &User) -> Result<(User, CallInfo), ClientError> {
        require_name(&user.username, "username")?;
        let info = self
            .send(Method::POST, self.url(&["users"]), Some(user))
            .await?;
        decode(info)
    }

    pub async fn update_user(
        &self,
        username: &str,
        params: &UserUpdateParams,
    ) -> Result<CallInfo, ClientError> {
        require_name(username, "username")?;
        self.send(Method::PUT, self.url(&["users", username]), Some(params))
            .await
    }

    pub async fn delete_user(&self, username: &str) -> Result<CallInfo, ClientError> {
        require_name(username, "username")?;
        self.send::<()>(Method::DELETE, self.url(&["users", username]), None)
            .await
    }
}
