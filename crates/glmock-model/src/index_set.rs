//! Index set records, update parameters and derived statistics.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::AddAssign;
use utoipa::ToSchema;

pub const DEFAULT_ROTATION_STRATEGY_CLASS: &str =
    "org.graylog2.indexer.rotation.strategies.MessageCountRotationStrategy";
pub const DEFAULT_RETENTION_STRATEGY_CLASS: &str =
    "org.graylog2.indexer.retention.strategies.DeletionRetentionStrategy";

/// Rotation/retention configuration for a family of indices sharing
/// `index_prefix`, which is the set's unique key.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(default)]
pub struct IndexSet {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub index_prefix: String,
    pub shards: u32,
    pub replicas: u32,
    pub rotation_strategy_class: String,
    #[schema(value_type = Object)]
    pub rotation_strategy: Value,
    pub retention_strategy_class: String,
    #[schema(value_type = Object)]
    pub retention_strategy: Value,
    pub index_analyzer: String,
    pub index_optimization_max_num_segments: u32,
    pub index_optimization_disabled: bool,
    pub writable: bool,
    #[serde(rename = "default")]
    pub is_default: bool,
    #[serde(rename = "creation_date", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for IndexSet {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: None,
            index_prefix: String::new(),
            shards: 4,
            replicas: 0,
            rotation_strategy_class: DEFAULT_ROTATION_STRATEGY_CLASS.to_string(),
            rotation_strategy: serde_json::json!({
                "type": "org.graylog2.indexer.rotation.strategies.MessageCountRotationStrategyConfig",
                "max_docs_per_index": 20_000_000
            }),
            retention_strategy_class: DEFAULT_RETENTION_STRATEGY_CLASS.to_string(),
            retention_strategy: serde_json::json!({
                "type": "org.graylog2.indexer.retention.strategies.DeletionRetentionStrategyConfig",
                "max_number_of_indices": 20
            }),
            index_analyzer: "standard".to_string(),
            index_optimization_max_num_segments: 1,
            index_optimization_disabled: false,
            writable: true,
            is_default: false,
            created_at: None,
        }
    }
}

impl IndexSet {
    pub fn new(title: impl Into<String>, index_prefix: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            index_prefix: index_prefix.into(),
            ..Self::default()
        }
    }
}

/// Partial index set update. `index_prefix` is immutable and has no field here.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default, PartialEq)]
#[serde(default)]
pub struct IndexSetUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shards: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_strategy_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub rotation_strategy: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_strategy_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub retention_strategy: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_analyzer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_optimization_max_num_segments: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_optimization_disabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
}

/// Derived statistics for one index set, or the sum over all of them.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSetStats {
    pub indices: u64,
    pub documents: u64,
    pub size: u64,
}

impl AddAssign for IndexSetStats {
    fn add_assign(&mut self, other: Self) {
        self.indices += other.indices;
        self.documents += other.documents;
        self.size += other.size;
    }
}
