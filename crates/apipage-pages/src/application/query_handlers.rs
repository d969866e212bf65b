//! Query handlers for the Pages context.

use apipage_core::error::StoreError;
use apipage_core::listing::{ListPage, ListQuery};
use tracing::debug;

use crate::domain::model::{Page, PageListItem};
use crate::domain::store::PageStore;

/// Retrieves a page by id; `Ok(None)` when it does not exist.
///
/// # Errors
///
/// Returns the store's error.
pub async fn get_page_by_id(
    page_id: u64,
    store: &dyn PageStore,
) -> Result<Option<Page>, StoreError> {
    store.get_by_id(page_id).await
}

/// Lists page projections.
///
/// # Errors
///
/// Returns `StoreError::UnknownSortKey` for an unsupported sort key, or the
/// store's error.
pub async fn list_pages(
    query: &ListQuery,
    store: &dyn PageStore,
) -> Result<ListPage<PageListItem>, StoreError> {
    debug!(
        offset = query.offset,
        limit = query.limit,
        sort = query.sort_key(),
        descending = query.descending,
        "listing pages"
    );
    store.list(query).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use apipage_core::listing::ListQuery;
    use chrono::{TimeZone, Utc};

    use crate::application::query_handlers::{get_page_by_id, list_pages};
    use crate::domain::model::Page;
    use crate::domain::store::PageStore;
    use crate::memory::InMemoryPageStore;
    use apipage_test_support::SteppingClock;

    #[tokio::test]
    async fn test_get_page_by_id_returns_stored_page() {
        // Arrange
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let store = InMemoryPageStore::new(Arc::new(SteppingClock::new(start)));
        let created = PageStore::create(&store, Page::new("Page 1", "Page 1 text"))
            .await
            .unwrap();

        // Act
        let page = get_page_by_id(created.id, &store).await.unwrap();

        // Assert
        assert_eq!(page, Some(created));
    }

    #[tokio::test]
    async fn test_list_pages_sorted_by_created_at_descending() {
        // Arrange
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let store = InMemoryPageStore::new(Arc::new(SteppingClock::new(start)));
        for title in ["first", "second", "third"] {
            PageStore::create(&store, Page::new(title, "text"))
                .await
                .unwrap();
        }
        let query = ListQuery {
            limit: 100,
            sort: "createdAt".to_owned(),
            descending: true,
            ..ListQuery::default()
        };

        // Act
        let page = list_pages(&query, &store).await.unwrap();

        // Assert
        let titles: Vec<&str> = page.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "second", "first"]);
        assert_eq!(page.total, 3);
    }
}
