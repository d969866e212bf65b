//! Domain layer for pages.

pub mod commands;
pub mod model;
pub mod store;
