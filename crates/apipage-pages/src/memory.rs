//! In-memory `PageStore`.

use apipage_core::error::StoreError;
use apipage_core::listing::{ListPage, ListQuery};
use apipage_core::memory::MemoryStore;
use async_trait::async_trait;

use crate::domain::model::{Page, PageListItem};
use crate::domain::store::PageStore;

/// Page store backed by process memory.
pub type InMemoryPageStore = MemoryStore<Page>;

#[async_trait]
impl PageStore for MemoryStore<Page> {
    async fn get_by_id(&self, id: u64) -> Result<Option<Page>, StoreError> {
        MemoryStore::get_by_id(self, id)
    }

    async fn list(&self, query: &ListQuery) -> Result<ListPage<PageListItem>, StoreError> {
        MemoryStore::list(self, query)
    }

    async fn create(&self, page: Page) -> Result<Page, StoreError> {
        MemoryStore::create(self, page)
    }

    async fn update(&self, page: Page) -> Result<Page, StoreError> {
        MemoryStore::update(self, page)
    }

    async fn delete(&self, id: u64) -> Result<(), StoreError> {
        MemoryStore::delete(self, id)
    }
}
