//! Wire messages pushed to WebSocket clients.

use apipage_events::domain::model::Event;
use apipage_pages::domain::model::Page;
use serde::{Deserialize, Serialize};

/// A content change, serialized as `{"event": <tag>, "data": {...}}`.
///
/// Create and update carry the full record; delete carries only the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum BroadcastMessage {
    #[serde(rename = "ap_event_created")]
    EventCreated { event: Event },
    #[serde(rename = "ap_event_updated")]
    EventUpdated { event: Event },
    #[serde(rename = "ap_event_deleted")]
    EventDeleted { id: u64 },
    #[serde(rename = "ap_page_created")]
    PageCreated { page: Page },
    #[serde(rename = "ap_page_updated")]
    PageUpdated { page: Page },
    #[serde(rename = "ap_page_deleted")]
    PageDeleted { id: u64 },
}

impl BroadcastMessage {
    /// The wire tag, also used as a log field.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "ap_event_created",
            Self::EventUpdated { .. } => "ap_event_updated",
            Self::EventDeleted { .. } => "ap_event_deleted",
            Self::PageCreated { .. } => "ap_page_created",
            Self::PageUpdated { .. } => "ap_page_updated",
            Self::PageDeleted { .. } => "ap_page_deleted",
        }
    }
}
