//! api-page core: shared store abstractions.
//!
//! This crate defines the pieces every resource context depends on: the
//! clock, command metadata, the store error taxonomy, the list engine that
//! filters/sorts/paginates record projections, and the generic in-memory
//! record store. It contains no HTTP or database code.

pub mod clock;
pub mod command;
pub mod error;
pub mod listing;
pub mod memory;
pub mod validate;
