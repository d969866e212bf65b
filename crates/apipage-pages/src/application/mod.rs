//! Application layer for pages.

pub mod command_handlers;
pub mod query_handlers;
