//! Failing stores: `PageStore`/`EventStore` implementations whose backend is
//! always unreachable.

use apipage_core::error::StoreError;
use apipage_core::listing::{ListPage, ListQuery};
use apipage_events::domain::model::{Event, EventListItem};
use apipage_events::domain::store::EventStore;
use apipage_pages::domain::model::{Page, PageListItem};
use apipage_pages::domain::store::PageStore;
use async_trait::async_trait;

fn unreachable_backend() -> StoreError {
    StoreError::Persistence("connection refused".into())
}

/// A page store that fails every operation with a persistence error.
#[derive(Debug)]
pub struct FailingPageStore;

#[async_trait]
impl PageStore for FailingPageStore {
    async fn get_by_id(&self, _id: u64) -> Result<Option<Page>, StoreError> {
        Err(unreachable_backend())
    }

    async fn list(&self, _query: &ListQuery) -> Result<ListPage<PageListItem>, StoreError> {
        Err(unreachable_backend())
    }

    async fn create(&self, _page: Page) -> Result<Page, StoreError> {
        Err(unreachable_backend())
    }

    async fn update(&self, _page: Page) -> Result<Page, StoreError> {
        Err(unreachable_backend())
    }

    async fn delete(&self, _id: u64) -> Result<(), StoreError> {
        Err(unreachable_backend())
    }
}

/// An event store that fails every operation with a persistence error.
#[derive(Debug)]
pub struct FailingEventStore;

#[async_trait]
impl EventStore for FailingEventStore {
    async fn get_by_id(&self, _id: u64) -> Result<Option<Event>, StoreError> {
        Err(unreachable_backend())
    }

    async fn list(&self, _query: &ListQuery) -> Result<ListPage<EventListItem>, StoreError> {
        Err(unreachable_backend())
    }

    async fn create(&self, _event: Event) -> Result<Event, StoreError> {
        Err(unreachable_backend())
    }

    async fn update(&self, _event: Event) -> Result<Event, StoreError> {
        Err(unreachable_backend())
    }

    async fn delete(&self, _id: u64) -> Result<(), StoreError> {
        Err(unreachable_backend())
    }
}
