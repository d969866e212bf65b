//! In-memory `EventStore`.

use apipage_core::error::StoreError;
use apipage_core::listing::{ListPage, ListQuery};
use apipage_core::memory::MemoryStore;
use async_trait::async_trait;

use crate::domain::model::{Event, EventListItem};
use crate::domain::store::EventStore;

/// Event store backed by process memory.
pub type InMemoryEventStore = MemoryStore<Event>;

#[async_trait]
impl EventStore for MemoryStore<Event> {
    async fn get_by_id(&self, id: u64) -> Result<Option<Event>, StoreError> {
        MemoryStore::get_by_id(self, id)
    }

    async fn list(&self, query: &ListQuery) -> Result<ListPage<EventListItem>, StoreError> {
        MemoryStore::list(self, query)
    }

    async fn create(&self, event: Event) -> Result<Event, StoreError> {
        MemoryStore::create(self, event)
    }

    async fn update(&self, event: Event) -> Result<Event, StoreError> {
        MemoryStore::update(self, event)
    }

    async fn delete(&self, id: u64) -> Result<(), StoreError> {
        MemoryStore::delete(self, id)
    }
}
