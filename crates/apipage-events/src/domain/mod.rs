//! Domain layer for events.

pub mod commands;
pub mod model;
pub mod store;
