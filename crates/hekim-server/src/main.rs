//! Hekim Server: application entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use hekim_cache::{EphemeralBackend, MemoryStore, RedisStore};
use hekim_core::clock::{Clock, SystemClock};
use hekim_db::{DbManager, ReferenceSeed, run_migrations};
use hekim_server::{AppState, ServerConfig, router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Hekim server");

    let db = DbManager::connect(&config.db())
        .await
        .context("connecting to SurrealDB")?;
    let applied = run_migrations(db.client()).await?;
    info!(applied, "Schema up to date");

    if let Some(path) = &config.seed_file {
        let seed = ReferenceSeed::from_json_file(path)?;
        seed.apply(db.client()).await?;
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: EphemeralBackend = match config.redis() {
        Some(redis) => RedisStore::connect(&redis)
            .await
            .context("connecting to Redis")?
            .into(),
        None => {
            warn!("No Redis URL configured, using the in-process store");
            MemoryStore::new(Arc::clone(&clock)).into()
        }
    };
    info!(backend = store.kind(), "Ephemeral store ready");

    let state = AppState::build(
        db.client().clone(),
        store,
        config.auth(),
        config.cache(),
        clock,
    );
    serve(router(state), &config).await
}

/// Bind the listener and serve until ctrl-c.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Hekim server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
