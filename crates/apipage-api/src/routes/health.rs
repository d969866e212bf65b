//! Health check endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status: `ok`, or `degraded` when the hub is not running.
    pub status: String,
    /// Service version.
    pub version: String,
    /// WebSocket clients currently attached to the hub.
    pub connected_clients: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, connected_clients) = match state.hub.connected_clients().await {
        Ok(count) => ("ok", count),
        Err(err) => {
            warn!(error = %err, "broadcast hub unavailable");
            ("degraded", 0)
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        connected_clients,
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
