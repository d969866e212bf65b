//! `PostgreSQL` implementation of the `PageStore` trait.

use std::fmt;
use std::sync::Arc;

use apipage_core::clock::Clock;
use apipage_core::error::StoreError;
use apipage_core::listing::{ListPage, ListQuery};
use apipage_pages::domain::model::{Page, PageListItem};
use apipage_pages::domain::store::PageStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::query::{
    ListSpec, db_id, persistence, push_filters, push_window, record_id, row_count,
};

const PAGE_COLUMNS: &str = "id, title, text, created_at, updated_at";

const PAGE_LIST: ListSpec = ListSpec {
    table: "pages",
    search: &["title"],
    kind: None,
    sort: &[
        ("id", "id"),
        ("title", "title COLLATE \"C\""),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
};

#[derive(FromRow)]
struct PageRow {
    id: i64,
    title: String,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PageRow> for Page {
    type Error = StoreError;

    fn try_from(row: PageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record_id(row.id)?,
            title: row.title,
            text: row.text,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct PageListRow {
    id: i64,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PageListRow> for PageListItem {
    type Error = StoreError;

    fn try_from(row: PageListRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record_id(row.id)?,
            title: row.title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed page store.
#[derive(Clone)]
pub struct PgPageStore {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for PgPageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgPageStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl PgPageStore {
    /// Creates a new `PgPageStore`.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl PageStore for PgPageStore {
    #[instrument(skip(self))]
    async fn get_by_id(&self, id: u64) -> Result<Option<Page>, StoreError> {
        let Some(id) = db_id(id) else {
            return Ok(None);
        };
        let row: Option<PageRow> =
            sqlx::query_as(&format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(persistence)?;
        row.map(Page::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &ListQuery) -> Result<ListPage<PageListItem>, StoreError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
        count.push(PAGE_LIST.table);
        push_filters(&mut count, &PAGE_LIST, query);
        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(persistence)?;
        let total = row_count(total);

        let key = query.sort_key();
        let Some(order) = PAGE_LIST.order_by(key) else {
            return Err(StoreError::UnknownSortKey {
                key: key.to_owned(),
                total,
            });
        };

        let mut select =
            QueryBuilder::<Postgres>::new("SELECT id, title, created_at, updated_at FROM ");
        select.push(PAGE_LIST.table);
        push_filters(&mut select, &PAGE_LIST, query);
        push_window(&mut select, order, query);
        let rows: Vec<PageListRow> = select
            .build_query_as::<PageListRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(persistence)?;

        let items = rows
            .into_iter()
            .map(PageListItem::try_from)
            .collect::<Result<_, _>>()?;
        Ok(ListPage { items, total })
    }

    #[instrument(skip(self, page), fields(title = %page.title))]
    async fn create(&self, page: Page) -> Result<Page, StoreError> {
        let now = self.clock.now();
        let row: PageRow = sqlx::query_as(&format!(
            "INSERT INTO pages (title, text, created_at, updated_at) \
             VALUES ($1, $2, $3, $3) RETURNING {PAGE_COLUMNS}"
        ))
        .bind(&page.title)
        .bind(&page.text)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(persistence)?;
        Page::try_from(row)
    }

    #[instrument(skip(self, page), fields(page_id = page.id))]
    async fn update(&self, page: Page) -> Result<Page, StoreError> {
        let Some(id) = db_id(page.id) else {
            return Err(StoreError::NotFound(page.id));
        };
        let row: Option<PageRow> = sqlx::query_as(&format!(
            "UPDATE pages SET title = $1, text = $2, updated_at = $3 \
             WHERE id = $4 RETURNING {PAGE_COLUMNS}"
        ))
        .bind(&page.title)
        .bind(&page.text)
        .bind(self.clock.now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence)?;
        row.ok_or(StoreError::NotFound(page.id))
            .and_then(Page::try_from)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: u64) -> Result<(), StoreError> {
        let Some(id) = db_id(id) else {
            return Ok(());
        };
        sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;
        Ok(())
    }
}
