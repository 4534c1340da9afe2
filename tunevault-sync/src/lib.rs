//! tunevault-sync library interface
//!
//! Cloud-sync helper for the tunevault player: downloads remote audio
//! resources, guarantees a legacy trailing tag block, persists results into
//! the synchronized store and tracks the synchronized-file counter.

pub mod api;
pub mod error;
pub mod fetch;
pub mod progress;
pub mod store;
pub mod sync;
pub mod tag;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sync::{Saver, SyncTracker};
use tunevault_common::events::EventBus;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Save orchestrator
    pub saver: Saver,
    /// Pending set and counter cache
    pub tracker: SyncTracker,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(event_bus: EventBus, saver: Saver, tracker: SyncTracker) -> Self {
        Self {
            event_bus,
            saver,
            tracker,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::save_routes())
        .merge(api::counter_routes())
        .merge(api::store_routes())
        .route("/events", get(api::event_stream))
        .merge(api::health_routes())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
