//! Mutation command metadata.

use uuid::Uuid;

/// Implemented by every create/update/delete command so handlers can log a
/// uniform set of fields before touching a store.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted name of the command, e.g. `pages.create`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID generated at the HTTP boundary.
    fn correlation_id(&self) -> Uuid;

    /// Identifier of the record the command targets; `None` for creations,
    /// whose id is assigned by the store.
    fn record_id(&self) -> Option<u64>;
}
