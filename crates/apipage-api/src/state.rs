//! Shared application state.

use std::fmt;
use std::sync::Arc;

use apipage_events::domain::store::EventStore;
use apipage_pages::domain::store::PageStore;
use apipage_realtime::bridge::Broadcaster;
use apipage_realtime::client::ConnectionConfig;
use apipage_realtime::hub::HubHandle;

use crate::graphql::{ApiSchema, build_schema};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Page persistence.
    pub page_store: Arc<dyn PageStore>,
    /// Event persistence.
    pub event_store: Arc<dyn EventStore>,
    /// Hub that WebSocket clients attach to.
    pub hub: HubHandle,
    /// Where change notifications go; the hub itself outside of tests.
    pub broadcaster: Arc<dyn Broadcaster>,
    /// Heartbeat and write limits for WebSocket clients.
    pub connection: ConnectionConfig,
    /// GraphQL schema over `page_store`.
    pub schema: ApiSchema,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("hub", &self.hub)
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state that announces changes through `hub`.
    #[must_use]
    pub fn new(
        page_store: Arc<dyn PageStore>,
        event_store: Arc<dyn EventStore>,
        hub: HubHandle,
    ) -> Self {
        let schema = build_schema(Arc::clone(&page_store));
        Self {
            page_store,
            event_store,
            broadcaster: Arc::new(hub.clone()),
            hub,
            connection: ConnectionConfig::default(),
            schema,
        }
    }

    /// Replaces the change-notification target.
    #[must_use]
    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn Broadcaster>) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    /// Replaces the WebSocket liveness limits.
    #[must_use]
    pub fn with_connection_config(mut self, connection: ConnectionConfig) -> Self {
        self.connection = connection;
        self
    }
}
