use crate::error::require_name;
use crate::{CallInfo, Client, ClientError, decode};
use glmock_model::{Role, RoleMembersBody, RoleUpdateParams, RolesBody};
use reqwest::Method;

impl Client {
    /// All roles and their total count.
    pub async fn list_roles(&self) -> Result<(RolesBody, CallInfo), ClientError> {
        self.get_json(self.url(&["roles"])).await
    }

    pub async fn get_role(&self, name: &str) -> Result<(Role, CallInfo), ClientError> {
        require_name(name, "role name")?;
        self.get_json(self.url(&["roles", name])).await
    }

    /// Create `role` and return it as stored (with id and creation time).
    pub async fn create_role(&self, role: &Role) -> Result<(Role, CallInfo), ClientError> {
        require_name(&role.name, "role name")?;
        let info = self
            .send(Method::POST, self.url(&["roles"]), Some(role))
            .await?;
        decode(info)
    }

    pub async fn update_role(
        &self,
        name: &str,
        params: &RoleUpdateParams,
    ) -> Result<CallInfo, ClientError> {
        require_name(name, "role name")?;
        self.send(Method::PUT, self.url(&["roles", name]), Some(params))
            .await
    }

    pub async fn delete_role(&self, name: &str) -> Result<CallInfo, ClientError> {
        require_name(name, "role name")?;
        self.send::<()>(Method::DELETE, self.url(&["roles", name]), None)
            .await
    }

    pub async fn role_members(
        &self,
        name: &str,
    ) -> Result<(RoleMembersBody, CallInfo), ClientError> {
        require_name(name, "role name")?;
        self.get_json(self.url(&["roles", name, "members"])).await
    }

    pub async fn add_role_member(
        &self,
        name: &str,
        username: &str,
    ) -> Result<CallInfo, ClientError> {
        require_name(name, "role name")?;
        require_name(username, "username")?;
        self.send::<()>(
            Method::PUT,
            self.url(&["roles", name, "members", username]),
            None,
        )
        .await
    }

    pub async fn remove_role_member(
        &self,
        name: &str,
        username: &str,
    ) -> Result<CallInfo, ClientError> {
        require_name(name, "role name")?;
        require_name(username, "username")?;
        self.send::<()>(
            Method::DELETE,
            self.url(&["roles", name, "members", username]),
            None,
        )
        .await
    }
}
