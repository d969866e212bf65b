//! Route modules organized by resource.

pub mod events;
pub mod graphql;
pub mod health;
pub mod pages;
pub mod params;
pub mod ws;
