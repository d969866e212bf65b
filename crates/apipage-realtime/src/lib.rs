//! api-page: real-time change notifications.
//!
//! A single hub task owns the set of connected WebSocket clients and fans
//! every content change out to them. Request handlers reach it through a
//! cloneable [`hub::HubHandle`], usually via the [`bridge::Broadcaster`]
//! seam.

pub mod bridge;
pub mod client;
pub mod error;
pub mod hub;
pub mod message;
