//! api-page HTTP API.
//!
//! REST routes for pages and events, a read-only GraphQL endpoint, the
//! WebSocket change feed and optional hosting of the single-page frontend.

pub mod config;
pub mod error;
pub mod graphql;
pub mod response;
pub mod routes;
pub mod state;
pub mod telemetry;

use std::any::Any;
use std::future::Future;
use std::io;
use std::path::Path;

use axum::Json;
use axum::Router;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::error::ErrorBody;
use crate::state::AppState;

/// The routed application behind trailing-slash normalisation. Paths are
/// rewritten before routing, so this wraps the [`Router`] rather than being
/// one of its layers.
pub type App = NormalizePath<Router>;

/// Unmatched `/api` paths get a JSON 404 instead of the frontend.
async fn api_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not_found",
            message: "no such endpoint".to_owned(),
        }),
    )
}

/// A handler panic becomes a JSON 500; the server keeps running.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = detail, "request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "internal_error",
            message: "internal server error".to_owned(),
        }),
    )
        .into_response()
}

/// Applies the cross-cutting middleware.
///
/// From the outside in: a UUID `x-request-id` is assigned unless the client
/// sent one, then CORS, the request span, echoing the request id on the
/// response, and panic recovery.
pub fn with_middleware(router: Router<AppState>) -> Router<AppState> {
    // TODO: Replace CorsLayer::permissive() with configured origins once the
    // frontend is served from a fixed host.
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Builds the application router.
///
/// Every route is mounted under `base_path` (empty for the root). When
/// `static_dir` is given, paths outside `/api` and `/health` are served from
/// it, falling back to its `index.html` so client-side routes resolve.
pub fn build_router(state: AppState, base_path: &str, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .nest("/pages", routes::pages::router())
        .nest("/events", routes::events::router())
        .merge(routes::ws::router())
        .merge(routes::graphql::router())
        .fallback(api_not_found);

    let mut app = Router::new()
        .merge(routes::health::router())
        .nest("/api", api);

    if let Some(dir) = static_dir {
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        app = app.fallback_service(spa);
    }

    let app = if base_path.is_empty() {
        app
    } else {
        Router::new().nest(base_path, app)
    };

    with_middleware(app).with_state(state)
}

/// Builds the router and wraps it so `/api/pages/` routes like `/api/pages`.
pub fn build_app(state: AppState, base_path: &str, static_dir: Option<&Path>) -> App {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, base_path, static_dir))
}

/// Serves `app` on `listener` until `shutdown` resolves, then waits for
/// in-flight requests to finish.
///
/// # Errors
///
/// Returns the listener's I/O error.
pub async fn serve<F>(listener: TcpListener, app: App, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, axum::ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    () = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to register SIGTERM handler");
                ctrl_c.await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }

    tracing::info!("shutdown signal received");
}
