//! `PostgreSQL` implementation of the `EventStore` trait.
//!
//! Fields live in `event_fields`, ordered by `position`. Create and update
//! write the event and its fields in one transaction; an update replaces the
//! whole field list.

use std::fmt;
use std::sync::Arc;

use apipage_core::clock::Clock;
use apipage_core::error::StoreError;
use apipage_core::listing::{ListPage, ListQuery};
use apipage_events::domain::model::{Event, EventKind, EventListItem, Field};
use apipage_events::domain::store::EventStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use crate::query::{
    ListSpec, db_id, persistence, push_filters, push_window, record_id, row_count,
};

const EVENT_COLUMNS: &str =
    "id, constant, label, value, description, kind, created_at, updated_at";

const EVENT_LIST: ListSpec = ListSpec {
    table: "events",
    search: &["constant", "COALESCE(label, '')", "value"],
    kind: Some("kind"),
    sort: &[
        ("id", "id"),
        ("constant", "constant COLLATE \"C\""),
        ("label", "COALESCE(label, '') COLLATE \"C\""),
        ("value", "value COLLATE \"C\""),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
};

fn parse_kind(kind: &str) -> Result<EventKind, StoreError> {
    kind.parse()
        .map_err(|_| StoreError::Persistence(format!("unknown event kind in database: {kind}")))
}

#[derive(FromRow)]
struct EventRow {
    id: i64,
    constant: String,
    label: Option<String>,
    value: String,
    description: String,
    kind: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self, fields: Vec<Field>) -> Result<Event, StoreError> {
        Ok(Event {
            id: record_id(self.id)?,
            kind: parse_kind(&self.kind)?,
            constant: self.constant,
            label: self.label,
            value: self.value,
            description: self.description,
            fields,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct EventListRow {
    id: i64,
    constant: String,
    label: Option<String>,
    value: String,
    kind: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventListRow> for EventListItem {
    type Error = StoreError;

    fn try_from(row: EventListRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record_id(row.id)?,
            kind: parse_kind(&row.kind)?,
            constant: row.constant,
            label: row.label,
            value: row.value,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct FieldRow {
    field_key: Option<String>,
    kind: String,
    required: bool,
    description: String,
}

impl From<FieldRow> for Field {
    fn from(row: FieldRow) -> Self {
        Self {
            key: row.field_key,
            kind: row.kind,
            required: row.required,
            description: row.description,
        }
    }
}

async fn insert_fields(
    conn: &mut PgConnection,
    event_id: i64,
    fields: &[Field],
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    if fields.is_empty() {
        return Ok(());
    }
    let mut insert = QueryBuilder::<Postgres>::new(
        "INSERT INTO event_fields \
         (event_id, position, field_key, kind, required, description, created_at, updated_at) ",
    );
    insert.push_values(fields.iter().enumerate(), |mut row, (position, field)| {
        row.push_bind(event_id)
            .push_bind(i32::try_from(position).unwrap_or(i32::MAX))
            .push_bind(field.key.clone())
            .push_bind(field.kind.clone())
            .push_bind(field.required)
            .push_bind(field.description.clone())
            .push_bind(now)
            .push_bind(now);
    });
    insert.build().execute(conn).await.map_err(persistence)?;
    Ok(())
}

/// PostgreSQL-backed event store.
#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for PgEventStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgEventStore")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl PgEventStore {
    /// Creates a new `PgEventStore`.
    #[must_use]
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    #[instrument(skip(self))]
    async fn get_by_id(&self, id: u64) -> Result<Option<Event>, StoreError> {
        let Some(id) = db_id(id) else {
            return Ok(None);
        };
        let row: Option<EventRow> =
            sqlx::query_as(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(persistence)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let fields: Vec<FieldRow> = sqlx::query_as(
            "SELECT field_key, kind, required, description FROM event_fields \
             WHERE event_id = $1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence)?;

        row.into_event(fields.into_iter().map(Field::from).collect())
            .map(Some)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &ListQuery) -> Result<ListPage<EventListItem>, StoreError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
        count.push(EVENT_LIST.table);
        push_filters(&mut count, &EVENT_LIST, query);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(persistence)?;
        let total = row_count(total);

        let key = query.sort_key();
        let Some(order) = EVENT_LIST.order_by(key) else {
            return Err(StoreError::UnknownSortKey {
                key: key.to_owned(),
                total,
            });
        };

        let mut select = QueryBuilder::<Postgres>::new(
            "SELECT id, constant, label, value, kind, created_at, updated_at FROM ",
        );
        select.push(EVENT_LIST.table);
        push_filters(&mut select, &EVENT_LIST, query);
        push_window(&mut select, order, query);
        let rows = select
            .build_query_as::<EventListRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(persistence)?;

        let items = rows
            .into_iter()
            .map(EventListItem::try_from)
            .collect::<Result<_, _>>()?;
        Ok(ListPage { items, total })
    }

    #[instrument(skip(self, event), fields(constant = %event.constant))]
    async fn create(&self, event: Event) -> Result<Event, StoreError> {
        let now = self.clock.now();
        let mut tx = self.pool.begin().await.map_err(persistence)?;

        let row: EventRow = sqlx::query_as(&format!(
            "INSERT INTO events \
             (constant, label, value, description, kind, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {EVENT_COLUMNS}"
        ))
        .bind(&event.constant)
        .bind(&event.label)
        .bind(&event.value)
        .bind(&event.description)
        .bind(event.kind.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(persistence)?;

        insert_fields(&mut tx, row.id, &event.fields, now).await?;
        tx.commit().await.map_err(persistence)?;

        row.into_event(event.fields)
    }

    #[instrument(skip(self, event), fields(event_id = event.id))]
    async fn update(&self, event: Event) -> Result<Event, StoreError> {
        let Some(id) = db_id(event.id) else {
            return Err(StoreError::NotFound(event.id));
        };
        let now = self.clock.now();
        let mut tx = self.pool.begin().await.map_err(persistence)?;

        let row: Option<EventRow> = sqlx::query_as(&format!(
            "UPDATE events SET constant = $1, label = $2, value = $3, description = $4, \
             kind = $5, updated_at = $6 WHERE id = $7 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(&event.constant)
        .bind(&event.label)
        .bind(&event.value)
        .bind(&event.description)
        .bind(event.kind.as_str())
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(persistence)?;
        // Dropping `tx` rolls back.
        let Some(row) = row else {
            return Err(StoreError::NotFound(event.id));
        };

        sqlx::query("DELETE FROM event_fields WHERE event_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(persistence)?;
        insert_fields(&mut tx, id, &event.fields, now).await?;
        tx.commit().await.map_err(persistence)?;

        row.into_event(event.fields)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: u64) -> Result<(), StoreError> {
        let Some(id) = db_id(id) else {
            return Ok(());
        };
        // Fields go with it through ON DELETE CASCADE.
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;
        Ok(())
    }
}
