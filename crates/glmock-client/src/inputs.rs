use crate::error::require_name;
use crate::{CallInfo, Client, ClientError, decode};
use glmock_model::{Input, InputUpdateParams, InputsBody};
use reqwest::Method;

impl Client {
    pub async fn list_inputs(&self) -> Result<(InputsBody, CallInfo), ClientError> {
        self.get_json(self.url(&["system", "inputs"])).await
    }

    pub async fn get_input(&self, id: &str) -> Result<(Input, CallInfo), ClientError> {
        require_name(id, "input id")?;
        self.get_json(self.url(&["system", "inputs", id])).await
    }

    pub async fn create_input(&self, input: &Input) -> Result<(Input, CallInfo), ClientError> {
        let info = self
            .send(Method::POST, self.url(&["system", "inputs"]), Some(input))
            .await?;
        decode(info)
    }

    pub async fn update_input(
        &self,
        id: &str,
        params: &InputUpdateParams,
    ) -> Result<CallInfo, ClientError> {
        require_name(id, "input id")?;
        self.send(Method::PUT, self.url(&["system", "inputs", id]), Some(params))
            .await
    }

    pub async fn delete_input(&self, id: &str) -> Result<CallInfo, ClientError> {
        require_name(id, "input id")?;
        self.send::<()>(Method::DELETE, self.url(&["system", "inputs", id]), None)
            .await
    }
}
