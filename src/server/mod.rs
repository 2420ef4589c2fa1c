use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::{catch_panic::CatchPanicLayer, timeout::TimeoutLayer};

use crate::config::ServerConfig;
use crate::graph::GraphDb;
use crate::graph::connection_pool::{ConnectionConfig, Neo4jPool};
use crate::store::{DataStore, NeoDataStore};

pub mod errors;
pub mod handlers;
pub mod health;
pub mod pagination;
pub mod shutdown;

pub use errors::ApiError;
use health::HealthChecker;
use shutdown::ShutdownOutcome;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub health: Arc<HealthChecker>,
    pub config: ServerConfig,
}

/// Routes of the public API, with panic and timeout guards
pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/code-lists", get(handlers::get_code_lists))
        .route("/code-lists/{id}", get(handlers::get_code_list))
        .route("/code-lists/{id}/editions", get(handlers::get_editions))
        .route("/code-lists/{id}/editions/{edition}", get(handlers::get_edition))
        .route(
            "/code-lists/{id}/editions/{edition}/codes",
            get(handlers::get_codes),
        )
        .route(
            "/code-lists/{id}/editions/{edition}/codes/{code}",
            get(handlers::get_code),
        )
        .layer(TimeoutLayer::new(timeout))
        .layer(CatchPanicLayer::new())
        .with_state(Arc::new(state))
}

pub async fn run_with_config(config: ServerConfig) -> anyhow::Result<()> {
    log::info!(
        "Server configuration: http={}, neo4j={}, code_list_label={}",
        config.http_bind_address(),
        config.neo4j_uri,
        config.code_list_label
    );

    let pool = Neo4jPool::connect(&ConnectionConfig::from(&config))
        .await
        .context("failed to connect to neo4j")?;
    let db = Arc::new(GraphDb::new(Arc::new(pool)));
    let health = Arc::new(HealthChecker::from_config(db.clone(), &config));
    let store: Arc<dyn DataStore> = Arc::new(NeoDataStore::new(db, &config));

    let http_bind_address = config.http_bind_address();
    let app = build_router(AppState {
        store,
        health,
        config: config.clone(),
    });

    let listener = TcpListener::bind(&http_bind_address)
        .await
        .with_context(|| format!("failed to bind HTTP listener to {}", http_bind_address))?;
    log::info!("Listening on {}", http_bind_address);

    let (shutdown_started, shutdown_rx) = oneshot::channel();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown::shutdown_signal().await;
            let _ = shutdown_started.send(());
        })
        .into_future();

    let grace = Duration::from_secs(config.graceful_shutdown_timeout_secs);
    let outcome = shutdown::serve_with_deadline(server, shutdown_rx, grace)
        .await
        .context("HTTP server error")?;

    match outcome {
        ShutdownOutcome::Completed => log::info!("Server stopped"),
        ShutdownOutcome::TimedOut => log::warn!(
            "Graceful shutdown exceeded {}s, dropping open connections",
            config.graceful_shutdown_timeout_secs
        ),
    }
    Ok(())
}
