//! Synchronized-file counter API handler

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// GET /counter response
#[derive(Debug, Serialize)]
pub struct CounterResponse {
    /// Display value: "" | "3" | "3+" | "..."
    pub value: String,
}

/// GET /counter
///
/// Current counter display value. Reading while the count is unknown kicks
/// off a recount and returns the provisional marker.
pub async fn current_counter(State(state): State<AppState>) -> Json<CounterResponse> {
    Json(CounterResponse {
        value: state.tracker.display(),
    })
}

/// Build counter routes
pub fn counter_routes() -> Router<AppState> {
    Router::new().route("/counter", get(current_counter))
}
