//! Mock server entry point.
//!
//! # Purpose
//! Loads configuration, installs tracing and metrics, then serves the mock API
//! and the Prometheus endpoint until Ctrl-C.
use anyhow::Context;
use mockserver::app::build_router;
use mockserver::config::MockServerConfig;
use mockserver::{build_state, observability};
use std::future::Future;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = MockServerConfig::from_env_or_yaml().context("mock server config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: MockServerConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability()?;
    let state = build_state(&config).await?;
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        auth_enabled = config.auth_enabled,
        consistency = ?config.consistency,
        persistent = config.data_path.is_some(),
        "mock server listening"
    );
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}
