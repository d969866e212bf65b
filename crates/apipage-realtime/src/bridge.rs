//! Mutation → broadcast bridge.
//!
//! Handlers announce every successful create, update and delete. Announcing
//! is best effort: a failure is logged and never reaches the HTTP response.

use tracing::{debug, warn};

use crate::error::HubError;
use crate::hub::HubHandle;
use crate::message::BroadcastMessage;

/// Something that can fan a change out to listeners.
pub trait Broadcaster: Send + Sync {
    /// Queues `message` for delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be queued.
    fn broadcast(&self, message: &BroadcastMessage) -> Result<(), HubError>;
}

impl Broadcaster for HubHandle {
    fn broadcast(&self, message: &BroadcastMessage) -> Result<(), HubError> {
        HubHandle::broadcast(self, message)
    }
}

/// Broadcasts `message`, logging instead of failing.
pub fn announce(broadcaster: &dyn Broadcaster, message: &BroadcastMessage) {
    match broadcaster.broadcast(message) {
        Ok(()) => debug!(event = message.tag(), "change announced"),
        Err(err) => warn!(event = message.tag(), error = %err, "failed to announce change"),
    }
}
