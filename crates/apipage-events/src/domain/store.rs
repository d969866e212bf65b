//! Event store abstraction.

use apipage_core::error::StoreError;
use apipage_core::listing::{ListPage, ListQuery};
use async_trait::async_trait;

use crate::domain::model::{Event, EventListItem};

/// Persistence contract for events and their fields.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Loads an event with its fields in order. A missing event is `Ok(None)`.
    async fn get_by_id(&self, id: u64) -> Result<Option<Event>, StoreError>;

    /// Filters (by constant, label, value and type), sorts and paginates
    /// event projections.
    async fn list(&self, query: &ListQuery) -> Result<ListPage<EventListItem>, StoreError>;

    /// Stores a new event with its fields.
    async fn create(&self, event: Event) -> Result<Event, StoreError>;

    /// Replaces the event with `event.id`, fields included.
    /// Fails with `StoreError::NotFound` if it does not exist.
    async fn update(&self, event: Event) -> Result<Event, StoreError>;

    /// Deletes an event and its fields; deleting a missing event succeeds.
    async fn delete(&self, id: u64) -> Result<(), StoreError>;
}
