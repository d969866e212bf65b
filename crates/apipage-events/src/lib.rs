//! api-page: Events bounded context.
//!
//! Analytics event definitions with their ordered parameter fields, the
//! `EventStore` contract, and the command/query handlers.

pub mod application;
pub mod domain;
pub mod memory;
