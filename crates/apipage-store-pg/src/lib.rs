//! api-page: PostgreSQL-backed stores.
//!
//! Implements `PageStore` and `EventStore` over a `sqlx` pool with the same
//! filter, sort and pagination semantics as the in-memory stores.

pub mod event_store;
pub mod page_store;
mod query;
pub mod schema;

pub use event_store::PgEventStore;
pub use page_store::PgPageStore;
