//! tunevault-sync - Cloud Sync Helper
//!
//! Saves remote audio resources into the synchronized store with a legacy
//! trailing tag block, and serves the synchronized-file counter to the
//! player UI via HTTP REST + SSE.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use tunevault_common::config;
use tunevault_common::events::EventBus;

use tunevault_sync::fetch::{AudioFetcher, HttpFetcher};
use tunevault_sync::store::{LocalStore, SyncStore};
use tunevault_sync::sync::{Saver, SyncTracker};
use tunevault_sync::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Resolve configuration: ENV overrides TOML overrides defaults
    let toml_config = config::TomlConfig::load_default();
    let store_root = config::resolve_store_root(&toml_config);
    let bind_address = config::resolve_bind_address(&toml_config);

    // Initialize tracing with the configured level
    let log_level = toml_config.logging.level.as_deref().unwrap_or("info");
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(log_level))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting tunevault-sync (Cloud Sync Helper)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Create the store root directory if missing
    config::ensure_store_root(&store_root)
        .map_err(|e| anyhow::anyhow!("Failed to initialize store root: {}", e))?;
    info!("Store root: {}", store_root.display());

    // Create event bus for SSE broadcasting
    let event_bus = EventBus::new(100); // 100 event capacity
    info!("Event bus initialized");

    // Wire the sync core
    let store: Arc<dyn SyncStore> = Arc::new(LocalStore::new(store_root));
    let fetcher: Arc<dyn AudioFetcher> = Arc::new(HttpFetcher::new());
    let tracker = SyncTracker::new(Arc::clone(&store), event_bus.clone());
    let saver = Saver::new(fetcher, store, tracker.clone(), event_bus.clone());

    // Create application state and router
    let state = AppState::new(event_bus, saver, tracker);
    let app = tunevault_sync::build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);
    info!("Health check: http://{}/health", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
