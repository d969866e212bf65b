//! WebSocket endpoint for change notifications.

use apipage_realtime::client::serve_ws;
use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::Response;
use axum::{Router, routing::get};

use crate::state::AppState;

/// GET /ws
async fn upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    serve_ws(ws, state.hub, state.connection)
}

/// Returns the WebSocket router.
pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(upgrade))
}
