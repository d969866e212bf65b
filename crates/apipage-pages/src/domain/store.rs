//! Page store abstraction.

use apipage_core::error::StoreError;
use apipage_core::listing::{ListPage, ListQuery};
use async_trait::async_trait;

use crate::domain::model::{Page, PageListItem};

/// Persistence contract for pages, shared by the in-memory and PostgreSQL
/// stores.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Loads a page. A missing page is `Ok(None)`.
    async fn get_by_id(&self, id: u64) -> Result<Option<Page>, StoreError>;

    /// Filters (by title), sorts and paginates page projections.
    async fn list(&self, query: &ListQuery) -> Result<ListPage<PageListItem>, StoreError>;

    /// Stores a new page and returns it with id and timestamps assigned.
    async fn create(&self, page: Page) -> Result<Page, StoreError>;

    /// Replaces the page with `page.id` and returns the stored version.
    /// Fails with `StoreError::NotFound` if it does not exist.
    async fn update(&self, page: Page) -> Result<Page, StoreError>;

    /// Deletes a page; deleting a missing page succeeds.
    async fn delete(&self, id: u64) -> Result<(), StoreError>;
}
