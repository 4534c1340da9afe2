//! Save request API handler

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// POST /save request
#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub artist: String,
    pub title: String,
    pub url: String,
}

/// POST /save response
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub status: &'static str,
}

/// POST /save
///
/// Enqueue a save. Returns 202 Accepted immediately; completion, failure
/// and progress arrive on the event stream. A request for a locator that is
/// already in flight is accepted and silently dropped.
pub async fn request_save(
    State(state): State<AppState>,
    Json(request): Json<SaveRequest>,
) -> ApiResult<(StatusCode, Json<SaveResponse>)> {
    if request.url.trim().is_empty() {
        return Err(ApiError::BadRequest("url must not be empty".to_string()));
    }

    state
        .saver
        .request_save(&request.artist, &request.title, &request.url);

    Ok((StatusCode::ACCEPTED, Json(SaveResponse { status: "queued" })))
}

/// Build save routes
pub fn save_routes() -> Router<AppState> {
    Router::new().route("/save", post(request_save))
}
