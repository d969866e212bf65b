//! Query handlers for the Events context.

use apipage_core::error::StoreError;
use apipage_core::listing::{ListPage, ListQuery};
use tracing::debug;

use crate::domain::model::{Event, EventListItem};
use crate::domain::store::EventStore;

/// Retrieves an event with its fields; `Ok(None)` when it does not exist.
///
/// # Errors
///
/// Returns the store's error.
pub async fn get_event_by_id(
    event_id: u64,
    store: &dyn EventStore,
) -> Result<Option<Event>, StoreError> {
    store.get_by_id(event_id).await
}

/// Lists event projections.
///
/// # Errors
///
/// Returns `StoreError::UnknownSortKey` for an unsupported sort key, or the
/// store's error.
pub async fn list_events(
    query: &ListQuery,
    store: &dyn EventStore,
) -> Result<ListPage<EventListItem>, StoreError> {
    debug!(
        offset = query.offset,
        limit = query.limit,
        sort = query.sort_key(),
        descending = query.descending,
        kind = %query.kind,
        "listing events"
    );
    store.list(query).await
}
