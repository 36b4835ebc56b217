//! Index set operations and statistics.
use super::{Engine, LogicError, LogicResult, Reply, integrity, observe, require_non_empty};
use crate::auth::Caller;
use crate::stats;
use crate::store::StoreError;
use glmock_model::{IndexSet, IndexSetStats, IndexSetUpdateParams, IndexSetsBody};

impl Engine {
    /// List index sets, optionally with per-set stats keyed by id.
    pub async fn list_index_sets(
        &self,
        caller: &Caller,
        with_stats: bool,
    ) -> LogicResult<IndexSetsBody> {
        observe("list_index_sets", async {
            self.authorize(caller, "indexsets:read", None).await?;
            let _guard = self.read_guard().await;
            let mut index_sets = self.store.index_sets.list().await;
            index_sets.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
            let stats = if with_stats {
                let inputs = self.store.inputs.list().await;
                Some(stats::stats_by_index_set(&index_sets, &inputs))
            } else {
                None
            };
            Ok(Reply::ok(IndexSetsBody {
                total: index_sets.len(),
                index_sets,
                stats,
            }))
        })
        .await
    }

    pub async fn get_index_set(&self, caller: &Caller, id: &str) -> LogicResult<IndexSet> {
        observe("get_index_set", async {
            self.authorize(caller, "indexsets:read", Some(id)).await?;
            let _guard = self.read_guard().await;
            Ok(Reply::ok(self.find_index_set(id).await?))
        })
        .await
    }

    /// Create an index set. The first set in an empty collection becomes the
    /// default; later ones never do on creation.
    pub async fn create_index_set(
        &self,
        caller: &Caller,
        mut index_set: IndexSet,
    ) -> LogicResult<IndexSet> {
        observe("create_index_set", async {
            self.authorize(caller, "indexsets:create", None).await?;
            require_non_empty(&index_set.title, "index set title")?;
            require_non_empty(&index_set.index_prefix, "index prefix")?;
            check_shards(index_set.shards)?;
            let _guard = self.write_guard().await;
            index_set.id.clear();
            index_set.is_default = self.store.index_sets.is_empty().await;
            if index_set.is_default && !index_set.writable {
                return Err(LogicError::Validation(
                    "the default index set must be writable".to_string(),
                ));
            }
            let prefix = index_set.index_prefix.clone();
            let stored = self
                .store
                .index_sets
                .add(index_set)
                .await
                .map_err(|err| match err {
                    StoreError::Conflict(_) => LogicError::Conflict(format!(
                        "index set with prefix <{prefix}> already exists"
                    )),
                    other => other.into(),
                })?;
            self.save().await?;
            tracing::info!(index_set_id = %stored.id, prefix = %stored.index_prefix, "index set created");
            Ok(Reply::ok(stored))
        })
        .await
    }

    pub async fn update_index_set(
        &self,
        caller: &Caller,
        id: &str,
        params: IndexSetUpdateParams,
    ) -> LogicResult<()> {
        observe("update_index_set", async {
            self.authorize(caller, "indexsets:edit", Some(id)).await?;
            if let Some(title) = &params.title {
                require_non_empty(title, "index set title")?;
            }
            if let Some(shards) = params.shards {
                check_shards(shards)?;
            }
            let _guard = self.write_guard().await;
            let current = self.find_index_set(id).await?;
            if current.is_default && params.writable == Some(false) {
                return Err(LogicError::Validation(
                    "the default index set must be writable".to_string(),
                ));
            }
            self.store.index_sets.update(id, params).await?;
            self.save().await?;
            tracing::info!(index_set_id = %id, "index set updated");
            Ok(Reply::no_content())
        })
        .await
    }

    /// Delete a non-default index set and clear input references to it.
    pub async fn delete_index_set(&self, caller: &Caller, id: &str) -> LogicResult<()> {
        observe("delete_index_set", async {
            self.authorize(caller, "indexsets:delete", Some(id)).await?;
            let _guard = self.write_guard().await;
            match self.store.index_sets.delete_unless(id, |set| set.is_default).await {
                Ok(Some(_)) => {}
                Ok(None) => return Err(index_set_not_found(id)),
                Err(_) => {
                    return Err(LogicError::Validation(
                        "the default index set cannot be deleted".to_string(),
                    ));
                }
            }
            integrity::clear_index_set_references(&self.store, id).await?;
            self.save().await?;
            tracing::info!(index_set_id = %id, "index set deleted");
            Ok(Reply::no_content())
        })
        .await
    }

    /// Make `id` the only default index set.
    pub async fn set_default_index_set(&self, caller: &Caller, id: &str) -> LogicResult<IndexSet> {
        observe("set_default_index_set", async {
            self.authorize(caller, "indexsets:edit", Some(id)).await?;
            let _guard = self.write_guard().await;
            let target = self.find_index_set(id).await?;
            if !target.writable {
                return Err(LogicError::Validation(
                    "a non-writable index set cannot be the default".to_string(),
                ));
            }
            // Flag the target before clearing the others: a concurrent delete
            // either beats this update (404, old default untouched) or is
            // refused because the target is already default.
            let updated = self
                .store
                .index_sets
                .update_with(id, |set| set.is_default = true)
                .await
                .map_err(|err| match err {
                    StoreError::NotFound(_) => index_set_not_found(id),
                    other => other.into(),
                })?;
            for other in self.store.index_sets.list().await {
                if other.is_default && other.id != id {
                    match self
                        .store
                        .index_sets
                        .update_with(&other.id, |set| set.is_default = false)
                        .await
                    {
                        Ok(_) | Err(StoreError::NotFound(_)) => {}
                        Err(err) => return Err(err.into()),
                    }
                }
            }
            self.save().await?;
            tracing::info!(index_set_id = %id, "default index set changed");
            Ok(Reply::ok(updated))
        })
        .await
    }

    pub async fn index_set_stats(&self, caller: &Caller, id: &str) -> LogicResult<IndexSetStats> {
        observe("index_set_stats", async {
            self.authorize(caller, "indexsets:read", Some(id)).await?;
            let _guard = self.read_guard().await;
            let index_sets = self.store.index_sets.list().await;
            let inputs = self.store.inputs.list().await;
            stats::stats_for_index_set(&index_sets, &inputs, id)
                .map(Reply::ok)
                .ok_or_else(|| index_set_not_found(id))
        })
        .await
    }

    pub async fn total_index_set_stats(&self, caller: &Caller) -> LogicResult<IndexSetStats> {
        observe("total_index_set_stats", async {
            self.authorize(caller, "indexsets:read", None).await?;
            let _guard = self.read_guard().await;
            let index_sets = self.store.index_sets.list().await;
            let inputs = self.store.inputs.list().await;
            Ok(Reply::ok(stats::total_stats(&index_sets, &inputs)))
        })
        .await
    }

    async fn find_index_set(&self, id: &str) -> Result<IndexSet, LogicError> {
        self.store
            .index_sets
            .get(id)
            .await
            .ok_or_else(|| index_set_not_found(id))
    }
}

fn check_shards(shards: u32) -> Result<(), LogicError> {
    if shards == 0 {
        return Err(LogicError::Validation(
            "shards must be at least 1".to_string(),
        ));
    }
    Ok(())
}

fn index_set_not_found(id: &str) -> LogicError {
    LogicError::NotFound(format!("no index set found with id <{id}>"))
}
