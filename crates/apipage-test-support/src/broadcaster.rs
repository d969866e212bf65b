//! Test broadcasters: `Broadcaster` implementations that never touch a hub.

use std::sync::Mutex;

use apipage_realtime::bridge::Broadcaster;
use apipage_realtime::error::HubError;
use apipage_realtime::message::BroadcastMessage;

/// A broadcaster that records every message it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingBroadcaster {
    sent: Mutex<Vec<BroadcastMessage>>,
}

impl RecordingBroadcaster {
    /// Creates a broadcaster with nothing recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all messages broadcast so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn messages(&self) -> Vec<BroadcastMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn broadcast(&self, message: &BroadcastMessage) -> Result<(), HubError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// A broadcaster whose hub has always gone away. Useful for checking that a
/// failed notification never changes an HTTP response.
#[derive(Debug)]
pub struct FailingBroadcaster;

impl Broadcaster for FailingBroadcaster {
    fn broadcast(&self, _message: &BroadcastMessage) -> Result<(), HubError> {
        Err(HubError::Stopped)
    }
}
