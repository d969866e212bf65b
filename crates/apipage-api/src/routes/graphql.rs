//! GraphQL endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use tracing::instrument;

use crate::state::AppState;

/// POST /graphql
#[instrument(skip_all)]
async fn execute(
    State(state): State<AppState>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(state.schema.execute(request).await)
}

/// Returns the GraphQL router.
pub fn router() -> Router<AppState> {
    Router::new().route("/graphql", post(execute))
}
