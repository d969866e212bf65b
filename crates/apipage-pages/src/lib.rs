//! api-page: Pages bounded context.
//!
//! Responsible for the page model, its list projection and sort registry,
//! the `PageStore` contract, and the command/query handlers the HTTP layer
//! calls into.

pub mod application;
pub mod domain;
pub mod memory;
