//! SQL rendering of list queries.
//!
//! Mirrors the in-memory list engine: case-insensitive substring search
//! (the needle is lower-cased here, the columns by `lower()`), exact type
//! filter, byte-order string sorting with ties broken by id, and
//! clamped pagination.

use apipage_core::error::StoreError;
use apipage_core::listing::ListQuery;
use sqlx::{Postgres, QueryBuilder};
use tracing::warn;

/// Where a resource's list query draws its filters and sort keys from.
pub(crate) struct ListSpec {
    /// Table to select from.
    pub table: &'static str,
    /// Columns searched by the free-text query.
    pub search: &'static [&'static str],
    /// Column holding the type tag, when the resource has one.
    pub kind: Option<&'static str>,
    /// Sort key to SQL expression.
    pub sort: &'static [(&'static str, &'static str)],
}

impl ListSpec {
    pub(crate) fn order_by(&self, key: &str) -> Option<&'static str> {
        self.sort
            .iter()
            .find_map(|(k, expr)| (*k == key).then_some(*expr))
    }
}

/// Escapes LIKE metacharacters and wraps the needle for a substring match.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Lower-cases `needle` the way the in-memory engine does and turns it into
/// a `LIKE` pattern.
pub(crate) fn search_pattern(needle: &str) -> String {
    like_pattern(&needle.to_lowercase())
}

/// Appends the `WHERE` clause for `query`, if any.
pub(crate) fn push_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    spec: &ListSpec,
    query: &ListQuery,
) {
    let mut separator = " WHERE ";
    if !query.query.is_empty() {
        let pattern = search_pattern(&query.query);
        builder.push(separator).push("(");
        for (i, column) in spec.search.iter().enumerate() {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push("lower(")
                .push(column)
                .push(") LIKE ")
                .push_bind(pattern.clone());
        }
        builder.push(")");
        separator = " AND ";
    }
    if let Some(kind_column) = spec.kind {
        if !query.kind.is_empty() {
            builder
                .push(separator)
                .push(kind_column)
                .push(" = ")
                .push_bind(query.kind.clone());
        }
    }
}

/// Appends `ORDER BY`, `LIMIT` and `OFFSET`.
pub(crate) fn push_window(builder: &mut QueryBuilder<'_, Postgres>, order: &str, query: &ListQuery) {
    let direction = if query.descending { "DESC" } else { "ASC" };
    builder
        .push(" ORDER BY ")
        .push(order)
        .push(" ")
        .push(direction)
        .push(", id ASC");
    if query.limit >= 0 {
        builder.push(" LIMIT ").push_bind(query.limit);
    }
    let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);
    builder.push(" OFFSET ").push_bind(offset);
}

/// Maps a driver error to the store taxonomy.
pub(crate) fn persistence(err: sqlx::Error) -> StoreError {
    warn!(error = %err, "database operation failed");
    StoreError::Persistence(err.to_string())
}

/// Converts a database id to a record id.
pub(crate) fn record_id(id: i64) -> Result<u64, StoreError> {
    u64::try_from(id).map_err(|_| StoreError::Persistence(format!("negative id in database: {id}")))
}

/// Converts a record id to a database id; ids beyond `i64::MAX` cannot exist.
pub(crate) fn db_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

/// Converts a filtered row count to `usize`.
pub(crate) fn row_count(count: i64) -> usize {
    usize::try_from(count).unwrap_or_default()
}
