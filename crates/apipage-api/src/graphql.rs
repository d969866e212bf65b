//! Read-only GraphQL schema.
//!
//! The schema exposes a single query, `page(id: Int!): Page`, resolved
//! through the page store.

use std::sync::Arc;

use apipage_pages::application::query_handlers;
use apipage_pages::domain::model::Page;
use apipage_pages::domain::store::PageStore;
use async_graphql::{Context, EmptyMutation, EmptySubscription, ID, Object, Schema};
use chrono::{DateTime, Utc};
use tracing::debug;

/// The executable schema.
pub type ApiSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Builds the schema over `page_store`.
#[must_use]
pub fn build_schema(page_store: Arc<dyn PageStore>) -> ApiSchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(page_store)
        .finish()
}

/// Root query type.
#[derive(Debug, Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Fetches a page by id; null when it does not exist.
    async fn page(
        &self,
        ctx: &Context<'_>,
        id: i32,
    ) -> async_graphql::Result<Option<PageObject>> {
        debug!(page_id = id, "resolving page query");
        // Negative ids are never assigned.
        let Ok(id) = u64::try_from(id) else {
            return Ok(None);
        };
        let store = ctx.data::<Arc<dyn PageStore>>()?;
        let page = query_handlers::get_page_by_id(id, store.as_ref()).await?;
        Ok(page.map(PageObject))
    }
}

/// GraphQL view of a page.
#[derive(Debug)]
pub struct PageObject(Page);

#[Object(name = "Page")]
impl PageObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.0.title
    }

    async fn text(&self) -> &str {
        &self.0.text
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

#[cfg(test)]
mod tests {
    use apipage_pages::memory::InMemoryPageStore;
    use apipage_test_support::{FailingPageStore, FixedClock};
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    async fn seeded_schema() -> ApiSchema {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let store: Arc<dyn PageStore> =
            Arc::new(InMemoryPageStore::new(Arc::new(FixedClock(at))));
        store
            .create(Page::new("Page 1", "Page 1 text"))
            .await
            .unwrap();
        build_schema(store)
    }

    #[tokio::test]
    async fn test_page_query_resolves_existing_page() {
        // Arrange
        let schema = seeded_schema().await;

        // Act
        let response = schema
            .execute("{ page(id: 1) { id title text createdAt updatedAt } }")
            .await;

        // Assert
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data["page"]["id"], json!("1"));
        assert_eq!(data["page"]["title"], json!("Page 1"));
        assert_eq!(data["page"]["text"], json!("Page 1 text"));
        assert_eq!(data["page"]["createdAt"], json!("2026-01-15T10:00:00+00:00"));
    }

    #[tokio::test]
    async fn test_page_query_for_missing_id_is_null() {
        let schema = seeded_schema().await;

        let response = schema.execute("{ page(id: 45) { title } }").await;

        assert!(response.errors.is_empty());
        assert_eq!(response.data.into_json().unwrap(), json!({ "page": null }));
    }

    #[tokio::test]
    async fn test_negative_id_is_null() {
        let schema = seeded_schema().await;

        let response = schema.execute("{ page(id: -1) { title } }").await;

        assert_eq!(response.data.into_json().unwrap(), json!({ "page": null }));
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_in_errors() {
        let schema = build_schema(Arc::new(FailingPageStore));

        let response = schema.execute("{ page(id: 1) { title } }").await;

        assert_eq!(response.errors.len(), 1);
        assert!(response.errors[0].message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_schema_is_read_only() {
        let schema = seeded_schema().await;

        let response = schema
            .execute("mutation { createPage(title: \"x\") { id } }")
            .await;

        assert!(!response.errors.is_empty());
    }
}
