//! Command handlers for the Events context.

use apipage_core::command::Command;
use apipage_core::error::StoreError;
use apipage_core::validate::require;
use tracing::info;

use crate::domain::commands::{CreateEvent, DeleteEvent, EventDraft, UpdateEvent};
use crate::domain::model::Event;
use crate::domain::store::EventStore;

fn validate_draft(draft: &EventDraft) -> Result<(), StoreError> {
    require("constant", &draft.constant)?;
    require("value", &draft.value)?;
    require("description", &draft.description)?;
    for (index, field) in draft.fields.iter().enumerate() {
        require(&format!("fields[{index}].type"), &field.kind)?;
        require(&format!("fields[{index}].description"), &field.description)?;
    }
    Ok(())
}

fn into_event(id: u64, draft: &EventDraft) -> Event {
    Event {
        id,
        constant: draft.constant.clone(),
        label: draft.label.clone(),
        value: draft.value.clone(),
        description: draft.description.clone(),
        kind: draft.kind,
        fields: draft.fields.clone(),
        ..Event::default()
    }
}

fn log_command(command: &dyn Command) {
    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        event_id = command.record_id(),
        "handling event command"
    );
}

/// Handles `CreateEvent`: stores a new event with its fields.
///
/// # Errors
///
/// Returns `StoreError::Validation` when a required value is blank, or the
/// store's error.
pub async fn handle_create_event(
    command: &CreateEvent,
    store: &dyn EventStore,
) -> Result<Event, StoreError> {
    log_command(command);
    validate_draft(&command.draft)?;
    store.create(into_event(0, &command.draft)).await
}

/// Handles `UpdateEvent`: replaces the event and its whole field list.
///
/// # Errors
///
/// Returns `StoreError::Validation` when a required value is blank,
/// `StoreError::NotFound` when the event does not exist, or the store's error.
pub async fn handle_update_event(
    command: &UpdateEvent,
    store: &dyn EventStore,
) -> Result<Event, StoreError> {
    log_command(command);
    validate_draft(&command.draft)?;
    store.update(into_event(command.event_id, &command.draft)).await
}

/// Handles `DeleteEvent`. Deleting an event that does not exist succeeds.
///
/// # Errors
///
/// Returns the store's error.
pub async fn handle_delete_event(
    command: &DeleteEvent,
    store: &dyn EventStore,
) -> Result<(), StoreError> {
    log_command(command);
    store.delete(command.event_id).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use apipage_core::error::StoreError;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_create_event, handle_delete_event, handle_update_event,
    };
    use crate::domain::commands::{CreateEvent, DeleteEvent, EventDraft, UpdateEvent};
    use crate::domain::model::{EventKind, Field};
    use crate::domain::store::EventStore;
    use crate::memory::InMemoryEventStore;
    use apipage_test_support::{FixedClock, SteppingClock};

    fn store() -> InMemoryEventStore {
        let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        InMemoryEventStore::new(Arc::new(FixedClock(fixed_now)))
    }

    fn field(key: &str, kind: &str) -> Field {
        Field {
            key: Some(key.to_owned()),
            kind: kind.to_owned(),
            required: true,
            description: format!("{key} parameter"),
        }
    }

    fn draft() -> EventDraft {
        EventDraft {
            constant: "SIGN_UP".to_owned(),
            label: Some("Sign up".to_owned()),
            value: "sign_up".to_owned(),
            description: "User completed registration".to_owned(),
            kind: EventKind::Client,
            fields: vec![field("plan", "string"), field("trial", "bool")],
        }
    }

    #[tokio::test]
    async fn test_handle_create_event_keeps_fields_in_order() {
        // Arrange
        let store = store();
        let command = CreateEvent {
            correlation_id: Uuid::new_v4(),
            draft: draft(),
        };

        // Act
        let event = handle_create_event(&command, &store).await.unwrap();

        // Assert
        assert_eq!(event.id, 1);
        assert_eq!(event.kind, EventKind::Client);
        let keys: Vec<_> = event.fields.iter().map(|f| f.key.as_deref()).collect();
        assert_eq!(keys, vec![Some("plan"), Some("trial")]);
    }

    #[tokio::test]
    async fn test_handle_create_event_rejects_blank_constant() {
        // Arrange
        let store = store();
        let mut invalid = draft();
        invalid.constant = "  ".to_owned();
        let command = CreateEvent {
            correlation_id: Uuid::new_v4(),
            draft: invalid,
        };

        // Act
        let result = handle_create_event(&command, &store).await;

        // Assert
        match result.unwrap_err() {
            StoreError::Validation(message) => assert!(message.contains("constant")),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_handle_create_event_rejects_field_without_type() {
        // Arrange
        let store = store();
        let mut invalid = draft();
        invalid.fields[1].kind = String::new();
        let command = CreateEvent {
            correlation_id: Uuid::new_v4(),
            draft: invalid,
        };

        // Act
        let result = handle_create_event(&command, &store).await;

        // Assert
        match result.unwrap_err() {
            StoreError::Validation(message) => assert!(message.contains("fields[1].type")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handle_update_event_replaces_fields_wholesale() {
        // Arrange
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let store = InMemoryEventStore::new(Arc::new(SteppingClock::new(start)));
        let created = handle_create_event(
            &CreateEvent {
                correlation_id: Uuid::new_v4(),
                draft: draft(),
            },
            &store,
        )
        .await
        .unwrap();
        let mut replacement = draft();
        replacement.label = None;
        replacement.fields = vec![field("source", "string")];
        let command = UpdateEvent {
            correlation_id: Uuid::new_v4(),
            event_id: created.id,
            draft: replacement,
        };

        // Act
        let updated = handle_update_event(&command, &store).await.unwrap();

        // Assert
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        let stored = EventStore::get_by_id(&store, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.label, None);
        assert_eq!(stored.fields, vec![field("source", "string")]);
    }

    #[tokio::test]
    async fn test_handle_update_event_for_missing_event_is_not_found() {
        // Arrange
        let store = store();
        let command = UpdateEvent {
            correlation_id: Uuid::new_v4(),
            event_id: 9,
            draft: draft(),
        };

        // Act
        let result = handle_update_event(&command, &store).await;

        // Assert
        assert!(matches!(result, Err(StoreError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_handle_delete_event_is_idempotent() {
        // Arrange
        let store = store();
        let created = handle_create_event(
            &CreateEvent {
                correlation_id: Uuid::new_v4(),
                draft: draft(),
            },
            &store,
        )
        .await
        .unwrap();
        let command = DeleteEvent {
            correlation_id: Uuid::new_v4(),
            event_id: created.id,
        };

        // Act
        handle_delete_event(&command, &store).await.unwrap();
        handle_delete_event(&command, &store).await.unwrap();

        // Assert
        assert!(store.is_empty().unwrap());
    }
}
