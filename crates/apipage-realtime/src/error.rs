//! Hub error types.

use thiserror::Error;

/// Error reported to callers of the hub.
///
/// Per-client delivery failures never appear here: the hub drops the client
/// instead.
#[derive(Debug, Error)]
pub enum HubError {
    /// The message could not be encoded for the wire.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The hub task is no longer running.
    #[error("broadcast hub stopped")]
    Stopped,
}
