use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// How the engine coordinates operations that touch several collections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyMode {
    /// Each collection is locked on its own; cascades are not atomic.
    #[default]
    PerCollection,
    /// Mutations take an engine-wide exclusive guard, reads the shared side.
    Serialized,
}

impl FromStr for ConsistencyMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "per_collection" | "per-collection" => Ok(Self::PerCollection),
            "serialized" => Ok(Self::Serialized),
            other => bail!("unknown consistency mode {other:?}"),
        }
    }
}

// Mock server configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct MockServerConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub data_path: Option<PathBuf>,
    pub auth_enabled: bool,
    pub consistency: ConsistencyMode,
    pub seed_defaults: bool,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 9000)),
            metrics_bind: SocketAddr::from(([127, 0, 0, 1], 9090)),
            data_path: None,
            auth_enabled: true,
            consistency: ConsistencyMode::PerCollection,
            seed_defaults: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MockServerConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    data_path: Option<PathBuf>,
    auth_enabled: Option<bool>,
    consistency: Option<ConsistencyMode>,
    seed_defaults: Option<bool>,
}

impl MockServerConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let bind_addr = match std::env::var("GLMOCK_BIND") {
            Ok(value) => value.parse().with_context(|| "parse GLMOCK_BIND")?,
            Err(_) => defaults.bind_addr,
        };
        let metrics_bind = match std::env::var("GLMOCK_METRICS_BIND") {
            Ok(value) => value.parse().with_context(|| "parse GLMOCK_METRICS_BIND")?,
            Err(_) => defaults.metrics_bind,
        };
        let data_path = std::env::var("GLMOCK_DATA_PATH")
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let auth_enabled = match std::env::var("GLMOCK_AUTH_ENABLED") {
            Ok(value) => parse_bool(&value).with_context(|| "parse GLMOCK_AUTH_ENABLED")?,
            Err(_) => defaults.auth_enabled,
        };
        let consistency = match std::env::var("GLMOCK_CONSISTENCY") {
            Ok(value) => value.parse().with_context(|| "parse GLMOCK_CONSISTENCY")?,
            Err(_) => defaults.consistency,
        };
        let seed_defaults = match std::env::var("GLMOCK_SEED_DEFAULTS") {
            Ok(value) => parse_bool(&value).with_context(|| "parse GLMOCK_SEED_DEFAULTS")?,
            Err(_) => defaults.seed_defaults,
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            data_path,
            auth_enabled,
            consistency,
            seed_defaults,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("GLMOCK_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read GLMOCK_CONFIG: {path}"))?;
            let override_cfg: MockServerConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse mock server config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.data_path {
                config.data_path = Some(value);
            }
            if let Some(value) = override_cfg.auth_enabled {
                config.auth_enabled = value;
            }
            if let Some(value) = override_cfg.consistency {
                config.consistency = value;
            }
            if let Some(value) = override_cfg.seed_defaults {
                config.seed_defaults = value;
            }
        }
        Ok(config)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got {other:?}"),
    }
}
