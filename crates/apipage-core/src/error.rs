//! Store error types.

use thiserror::Error;

/// Error returned by every store operation and by the list engine.
///
/// Absence of a record on lookup is not an error: `get_by_id` reports it as
/// `Ok(None)`. `NotFound` is only produced by operations that require the
/// record to exist (update).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The record to mutate does not exist.
    #[error("record not found: {0}")]
    NotFound(u64),

    /// Malformed or incomplete input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The requested sort key is not in the resource's comparator registry.
    /// `total` is the size of the filtered set, which is still meaningful.
    #[error("unknown sort key: {key}")]
    UnknownSortKey {
        /// The rejected key.
        key: String,
        /// Number of records that passed the filter.
        total: usize,
    },

    /// Underlying storage failure.
    #[error("persistence error: {0}")]
    Persistence(String),
}
