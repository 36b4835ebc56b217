//! In-process mock of a log-management REST API.
//!
//! # Purpose
//! Exposes the mock engine (store, authorization gate, integrity rules,
//! operations, statistics, persistence) and its thin HTTP adapter for use by
//! the binary, the typed client's tests and downstream test suites.
//!
//! # Notes
//! [`start`] is the embedding entry point: it binds a listener, serves the
//! router on a background task and hands back the address.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod logic;
pub mod observability;
pub mod persist;
pub mod stats;
pub mod store;
pub mod validate;

use anyhow::Context;
use app::{AppState, build_router};
use config::MockServerConfig;
use logic::Engine;
use persist::{JsonFilePersister, NoopPersister, Persister};
use std::net::SocketAddr;
use std::sync::Arc;
use store::MockStore;
use tokio::task::JoinHandle;

/// Build the engine described by `config`: load a saved snapshot when a data
/// path is set, pick the persister, and seed the built-in roles if asked.
pub async fn build_state(config: &MockServerConfig) -> anyhow::Result<AppState> {
    let (store, persister): (MockStore, Arc<dyn Persister>) = match &config.data_path {
        Some(path) => {
            let store = match persist::load_snapshot(path).await? {
                Some(snapshot) => MockStore::from_snapshot(snapshot)
                    .with_context(|| format!("restore store from {}", path.display()))?,
                None => MockStore::new(),
            };
            (store, Arc::new(JsonFilePersister::new(path)))
        }
        None => (MockStore::new(), Arc::new(NoopPersister)),
    };
    let engine = Engine::new(
        Arc::new(store),
        persister,
        config.auth_enabled,
        config.consistency,
    );
    if config.seed_defaults {
        engine
            .seed_defaults()
            .await
            .context("seed default roles and admin user")?;
    }
    Ok(AppState {
        engine: Arc::new(engine),
    })
}

/// A mock server running on a background task.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub state: AppState,
    task: JoinHandle<()>,
}

impl RunningServer {
    /// Base URL of the API, e.g. `http://127.0.0.1:40123/api`.
    pub fn endpoint(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn shutdown(self) {
        self.task.abort();
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Bind `config.bind_addr` (port 0 picks a free port) and serve the API in the
/// background.
pub async fn start(config: &MockServerConfig) -> anyhow::Result<RunningServer> {
    let state = build_state(config).await?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("bind {}", config.bind_addr))?;
    let addr = listener.local_addr()?;
    let app = build_router(state.clone());
    let task = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app.into_make_service()).await {
            tracing::error!(error = %err, "mock server stopped");
        }
    });
    tracing::info!(%addr, "mock server listening");
    Ok(RunningServer { addr, state, task })
}
