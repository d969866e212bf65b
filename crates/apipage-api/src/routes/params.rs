//! Request parameters shared by the resource routes.

use apipage_core::listing::ListQuery;
use serde::Deserialize;

use crate::error::ApiError;

/// Page size used when `limit` is absent or not a number.
pub const DEFAULT_LIMIT: i64 = 100;

/// Sort key used when the request names none.
pub const DEFAULT_SORT: &str = "createdAt";

/// Query string of a list request.
///
/// Every value is taken as text and parsed leniently: an unparsable
/// `offset` or `limit` falls back to its default instead of failing the
/// request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub descending: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub query: Option<String>,
}

impl ListParams {
    /// Resolves defaults. Without a sort key the newest records come first.
    #[must_use]
    pub fn into_query(self) -> ListQuery {
        let sort = self.sort.unwrap_or_default();
        let (sort, descending) = if sort.is_empty() {
            (DEFAULT_SORT.to_owned(), true)
        } else {
            (sort, self.descending.as_deref() == Some("true"))
        };

        ListQuery {
            offset: self
                .offset
                .and_then(|raw| raw.parse().ok())
                .unwrap_or_default(),
            limit: self
                .limit
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_LIMIT),
            sort,
            descending,
            kind: self.kind.unwrap_or_default(),
            query: self.query.unwrap_or_default(),
        }
    }
}

/// Parses a record id taken from the request path.
///
/// # Errors
///
/// Returns a validation error when `raw` is not an unsigned integer.
pub fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse().map_err(|_| ApiError::invalid_id(raw))
}
