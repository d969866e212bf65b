//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use apipage_core::clock::Clock;
use apipage_events::memory::InMemoryEventStore;
use apipage_pages::memory::InMemoryPageStore;
use apipage_realtime::client::ConnectionConfig;
use apipage_realtime::hub::{Hub, HubConfig, HubHandle};
use apipage_test_support::SteppingClock;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use apipage_api::{App, build_app};
use apipage_api::state::AppState;

/// A running test application and the hub behind it.
pub struct TestApp {
    pub router: App,
    pub hub: HubHandle,
}

/// Clock that starts at a fixed instant and advances one second per reading,
/// so every write gets a distinct timestamp.
fn stepping_clock() -> Arc<dyn Clock> {
    Arc::new(SteppingClock::new(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// Build the full app over in-memory stores with a running hub. Uses the
/// same router as `main.rs`. Must be called inside a Tokio runtime.
pub fn build_test_app() -> TestApp {
    build_test_app_with("", None)
}

/// Like [`build_test_app`], mounted under `base_path` and optionally serving
/// `static_dir`.
pub fn build_test_app_with(base_path: &str, static_dir: Option<&Path>) -> TestApp {
    build_test_app_from(
        base_path,
        static_dir,
        HubConfig::default(),
        ConnectionConfig::default(),
    )
}

/// Like [`build_test_app`], with explicit hub and WebSocket connection limits.
pub fn build_test_app_with_limits(hub: HubConfig, connection: ConnectionConfig) -> TestApp {
    build_test_app_from("", None, hub, connection)
}

fn build_test_app_from(
    base_path: &str,
    static_dir: Option<&Path>,
    hub_config: HubConfig,
    connection: ConnectionConfig,
) -> TestApp {
    let clock = stepping_clock();
    let page_store = Arc::new(InMemoryPageStore::new(Arc::clone(&clock)));
    let event_store = Arc::new(InMemoryEventStore::new(clock));
    let (hub, hub_loop) = Hub::new(hub_config);
    tokio::spawn(hub_loop.run());

    let app_state = AppState::new(page_store, event_store, hub.clone())
        .with_connection_config(connection);
    TestApp {
        router: build_app(app_state, base_path, static_dir),
        hub,
    }
}

async fn send(app: App, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: App,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response. An empty body reads as
/// `Value::Null`.
pub async fn get_json(app: App, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response.
pub async fn delete(app: App, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Serves `app` on an ephemeral local port and returns its address.
pub async fn serve_on_local_port(app: App) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(apipage_api::serve(listener, app, std::future::pending()));
    addr
}

/// Polls the hub until it reports `expected` clients.
///
/// # Panics
///
/// Panics if the count is not reached within about two seconds.
pub async fn wait_for_clients(hub: &HubHandle, expected: usize) {
    for _ in 0..200 {
        if hub.connected_clients().await.unwrap() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("hub never reached {expected} connected clients");
}
