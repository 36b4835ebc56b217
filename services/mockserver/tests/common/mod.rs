#![allow(dead_code)]

use axum::body::Body;
use axum::routing::RouterIntoService;
use glmock_model::User;
use mockserver::app::{AppState, build_router};
use mockserver::config::ConsistencyMode;
use mockserver::logic::Engine;
use mockserver::persist::{NoopPersister, Persister};
use mockserver::store::MockStore;
use std::sync::Arc;

pub const ROOT: &str = "root";
pub const NOBODY: &str = "nobody";

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

/// An engine whose store holds `root` (direct `*` grant) and `nobody` (no
/// grants), without the built-in roles.
pub async fn engine_with(persister: Arc<dyn Persister>, consistency: ConsistencyMode) -> Arc<Engine> {
    let store = Arc::new(MockStore::new());
    let mut root = User::new(ROOT);
    root.permissions = vec!["*".to_string()];
    store.users.add(root).await.expect("root");
    store.users.add(User::new(NOBODY)).await.expect("nobody");
    Arc::new(Engine::new(store, persister, true, consistency))
}

pub async fn test_engine() -> Arc<Engine> {
    engine_with(Arc::new(NoopPersister), ConsistencyMode::PerCollection).await
}

pub fn app(engine: Arc<Engine>) -> RouterIntoService<Body, ()> {
    build_router(AppState { engine }).into_service()
}
