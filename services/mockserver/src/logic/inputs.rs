//! Input operations.
use super::{Engine, LogicError, LogicResult, Reply, observe, require_non_empty};
use crate::auth::Caller;
use glmock_model::{Input, InputUpdateParams, InputsBody};

impl Engine {
    pub async fn list_inputs(&self, caller: &Caller) -> LogicResult<InputsBody> {
        observe("list_inputs", async {
            self.authorize(caller, "inputs:read", None).await?;
            let _guard = self.read_guard().await;
            let mut inputs = self.store.inputs.list().await;
            inputs.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
            Ok(Reply::ok(InputsBody {
                total: inputs.len(),
                inputs,
            }))
        })
        .await
    }

    pub async fn get_input(&self, caller: &Caller, id: &str) -> LogicResult<Input> {
        observe("get_input", async {
            self.authorize(caller, "inputs:read", Some(id)).await?;
            let _guard = self.read_guard().await;
            Ok(Reply::ok(self.find_input(id).await?))
        })
        .await
    }

    pub async fn create_input(&self, caller: &Caller, mut input: Input) -> LogicResult<Input> {
        observe("create_input", async {
            let principal = self.authorize(caller, "inputs:create", None).await?;
            require_non_empty(&input.title, "input title")?;
            require_non_empty(&input.kind, "input type")?;
            let _guard = self.write_guard().await;
            self.check_index_set_ref(input.index_set_id.as_deref()).await?;
            input.id.clear();
            input.creator_user_id = principal.map(|p| p.username().to_string());
            let stored = self.store.inputs.add(input).await?;
            self.save().await?;
            tracing::info!(input_id = %stored.id, title = %stored.title, "input created");
            Ok(Reply::ok(stored))
        })
        .await
    }

    /// Replace title, type and attributes; `global`, `node` and
    /// `index_set_id` change only when present.
    pub async fn update_input(
        &self,
        caller: &Caller,
        id: &str,
        params: InputUpdateParams,
    ) -> LogicResult<()> {
        observe("update_input", async {
            self.authorize(caller, "inputs:edit", Some(id)).await?;
            require_non_empty(&params.title, "input title")?;
            require_non_empty(&params.kind, "input type")?;
            let _guard = self.write_guard().await;
            self.check_index_set_ref(params.index_set_id.as_deref()).await?;
            if !self.store.inputs.has(id).await {
                return Err(input_not_found(id));
            }
            self.store.inputs.update(id, params).await?;
            self.save().await?;
            tracing::info!(input_id = %id, "input updated");
            Ok(Reply::no_content())
        })
        .await
    }

    pub async fn delete_input(&self, caller: &Caller, id: &str) -> LogicResult<()> {
        observe("delete_input", async {
            self.authorize(caller, "inputs:terminate", Some(id)).await?;
            let _guard = self.write_guard().await;
            if self.store.inputs.delete(id).await.is_none() {
                return Err(input_not_found(id));
            }
            self.save().await?;
            tracing::info!(input_id = %id, "input deleted");
            Ok(Reply::no_content())
        })
        .await
    }

    async fn find_input(&self, id: &str) -> Result<Input, LogicError> {
        self.store
            .inputs
            .get(id)
            .await
            .ok_or_else(|| input_not_found(id))
    }

    async fn check_index_set_ref(&self, index_set_id: Option<&str>) -> Result<(), LogicError> {
        if let Some(id) = index_set_id {
            if !self.store.index_sets.has(id).await {
                return Err(LogicError::Validation(format!(
                    "no index set found with id <{id}>"
                )));
            }
        }
        Ok(())
    }
}

fn input_not_found(id: &str) -> LogicError {
    LogicError::NotFound(format!("no input found with id <{id}>"))
}
