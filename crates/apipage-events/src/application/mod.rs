//! Application layer for events.

pub mod command_handlers;
pub mod query_handlers;
