//! Commands for the Events context.

use apipage_core::command::Command;
use uuid::Uuid;

use crate::domain::model::{EventKind, Field};

/// Mutable content of an event, shared by create and update.
#[derive(Debug, Clone, Default)]
pub struct EventDraft {
    pub constant: String,
    pub label: Option<String>,
    pub value: String,
    pub description: String,
    pub kind: EventKind,
    pub fields: Vec<Field>,
}

/// Command to create an event.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Content of the new event.
    pub draft: EventDraft,
}

impl Command for CreateEvent {
    fn command_type(&self) -> &'static str {
        "events.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn record_id(&self) -> Option<u64> {
        None
    }
}

/// Command to replace an event, fields included.
#[derive(Debug, Clone)]
pub struct UpdateEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The event to update.
    pub event_id: u64,
    /// Replacement content.
    pub draft: EventDraft,
}

impl Command for UpdateEvent {
    fn command_type(&self) -> &'static str {
        "events.update"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn record_id(&self) -> Option<u64> {
        Some(self.event_id)
    }
}

/// Command to delete an event.
#[derive(Debug, Clone)]
pub struct DeleteEvent {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The event to delete.
    pub event_id: u64,
}

impl Command for DeleteEvent {
    fn command_type(&self) -> &'static str {
        "events.delete"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn record_id(&self) -> Option<u64> {
        Some(self.event_id)
    }
}
