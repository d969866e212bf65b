//! List engine: filter, sort and paginate record projections.
//!
//! Both the in-memory stores and the PostgreSQL stores answer list requests
//! with the same semantics; this module is the reference for them.

use std::cmp::Ordering;
use std::ops::Range;

use crate::error::StoreError;

/// Sort key applied when a query does not name one.
pub const DEFAULT_SORT_KEY: &str = "id";

/// Entry in a resource's comparator registry.
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// A list projection the engine can filter and sort.
pub trait Listable: Sized {
    /// Returns `true` when any searchable field contains `needle`.
    /// `needle` is already lower-cased and non-empty.
    fn matches_query(&self, needle: &str) -> bool;

    /// The record's type tag. Resources without one return `None` and are
    /// never excluded by a type filter.
    fn kind(&self) -> Option<&str> {
        None
    }

    /// Looks up the comparator registered under `key`.
    fn comparator(key: &str) -> Option<Comparator<Self>>;
}

/// Parameters of a list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// Number of filtered, sorted records to skip.
    pub offset: usize,
    /// Page size; negative means "everything after `offset`".
    pub limit: i64,
    /// Registry key of the comparator; empty selects [`DEFAULT_SORT_KEY`].
    pub sort: String,
    /// Sort in descending order.
    pub descending: bool,
    /// Exact type tag to keep; empty disables the filter.
    pub kind: String,
    /// Case-insensitive substring to search for; empty disables the filter.
    pub query: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: -1,
            sort: String::new(),
            descending: false,
            kind: String::new(),
            query: String::new(),
        }
    }
}

impl ListQuery {
    /// The effective sort key.
    #[must_use]
    pub fn sort_key(&self) -> &str {
        if self.sort.is_empty() {
            DEFAULT_SORT_KEY
        } else {
            &self.sort
        }
    }

    /// Index range of the requested page within a filtered set of `total`
    /// records. Out-of-range offsets and limits are clamped, never rejected.
    #[must_use]
    pub fn window(&self, total: usize) -> Range<usize> {
        let start = self.offset.min(total);
        let len = usize::try_from(self.limit).map_or(total, |limit| limit.min(total));
        start..start.saturating_add(len).min(total)
    }
}

/// One page of list results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    /// Records in the requested window.
    pub items: Vec<T>,
    /// Number of records that passed the filter, before pagination.
    pub total: usize,
}

/// Lower-cased substring test used by `Listable::matches_query` impls.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Filters, sorts and paginates `records`.
///
/// Sorting is stable. A descending sort swaps the comparator's arguments
/// instead of reversing the output, so equal keys keep their filtered-set
/// order in both directions.
///
/// # Errors
///
/// Returns `StoreError::UnknownSortKey` carrying the filtered total when the
/// sort key is not registered for `T`.
pub fn list<T, I>(records: I, query: &ListQuery) -> Result<ListPage<T>, StoreError>
where
    T: Listable,
    I: IntoIterator<Item = T>,
{
    let needle = query.query.to_lowercase();
    let mut filtered: Vec<T> = records
        .into_iter()
        .filter(|record| needle.is_empty() || record.matches_query(&needle))
        .filter(|record| {
            query.kind.is_empty() || record.kind().is_none_or(|kind| kind == query.kind)
        })
        .collect();
    let total = filtered.len();

    let key = query.sort_key();
    let Some(compare) = T::comparator(key) else {
        return Err(StoreError::UnknownSortKey {
            key: key.to_owned(),
            total,
        });
    };

    if query.descending {
        filtered.sort_by(|a, b| compare(b, a));
    } else {
        filtered.sort_by(compare);
    }

    let items = filtered.drain(query.window(total)).collect();
    Ok(ListPage { items, total })
}
