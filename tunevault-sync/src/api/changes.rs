//! Store change notification API handler
//!
//! The external sync agent calls this endpoint whenever the synchronized
//! store changes. Only remote-originated changes invalidate the counter:
//! locally originated writes are already accounted for through the save
//! pipeline's increment and must not double-count.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use tracing::{debug, info};

use crate::AppState;

/// Direction of a synchronized-store change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    RemoteToLocal,
    LocalToRemote,
}

/// POST /store/changes request
#[derive(Debug, Deserialize)]
pub struct StoreChangeNotice {
    pub direction: ChangeDirection,
    /// Entry name that changed, when the agent knows it
    #[serde(default)]
    pub entry: Option<String>,
}

/// POST /store/changes
pub async fn store_changed(
    State(state): State<AppState>,
    Json(notice): Json<StoreChangeNotice>,
) -> StatusCode {
    match notice.direction {
        ChangeDirection::RemoteToLocal => {
            info!(entry = ?notice.entry, "Remote store change, invalidating counter");
            state.tracker.invalidate();
        }
        ChangeDirection::LocalToRemote => {
            debug!(entry = ?notice.entry, "Local-origin store change, already accounted for");
        }
    }

    StatusCode::NO_CONTENT
}

/// Build store notification routes
pub fn store_routes() -> Router<AppState> {
    Router::new().route("/store/changes", post(store_changed))
}
