use crate::error::require_name;
use crate::{CallInfo, Client, ClientError, decode};
use glmock_model::{IndexSet, IndexSetStats, IndexSetUpdateParams, IndexSetsBody};
use reqwest::{Method, Url};

const INDEX_SETS: [&str; 3] = ["system", "indices", "index_sets"];

impl Client {
    fn index_set_url(&self, rest: &[&str]) -> Url {
        let segments: Vec<&str> = INDEX_SETS.iter().chain(rest).copied().collect();
        self.url(&segments)
    }

    /// All index sets; with `stats` the body also maps each id to its stats.
    pub async fn list_index_sets(
        &self,
        stats: bool,
    ) -> Result<(IndexSetsBody, CallInfo), ClientError> {
        let mut url = self.index_set_url(&[]);
        if stats {
            url.query_pairs_mut().append_pair("stats", "true");
        }
        self.get_json(url).await
    }

    pub async fn get_index_set(&self, id: &str) -> Result<(IndexSet, CallInfo), ClientError> {
        require_name(id, "index set id")?;
        self.get_json(self.index_set_url(&[id])).await
    }

    pub async fn create_index_set(
        &self,
        index_set: &IndexSet,
    ) -> Result<(IndexSet, CallInfo), ClientError> {
        let info = self
            .send(Method::POST, self.index_set_url(&[]), Some(index_set))
            .await?;
        decode(info)
    }

    pub async fn update_index_set(
        &self,
        id: &str,
        params: &IndexSetUpdateParams,
    ) -> Result<CallInfo, ClientError> {
        require_name(id, "index set id")?;
        self.send(Method::PUT, self.index_set_url(&[id]), Some(params))
            .await
    }

    pub async fn delete_index_set(&self, id: &str) -> Result<CallInfo, ClientError> {
        require_name(id, "index set id")?;
        self.send::<()>(Method::DELETE, self.index_set_url(&[id]), None)
            .await
    }

    pub async fn set_default_index_set(
        &self,
        id: &str,
    ) -> Result<(IndexSet, CallInfo), ClientError> {
        require_name(id, "index set id")?;
        let info = self
            .send::<()>(Method::PUT, self.index_set_url(&[id, "default"]), None)
            .await?;
        decode(info)
    }

    pub async fn index_set_stats(
        &self,
        id: &str,
    ) -> Result<(IndexSetStats, CallInfo), ClientError> {
        require_name(id, "index set id")?;
        self.get_json(self.index_set_url(&[id, "stats"])).await
    }

    pub async fn total_index_set_stats(&self) -> Result<(IndexSetStats, CallInfo), ClientError> {
        self.get_json(self.index_set_url(&["stats"])).await
    }
}
