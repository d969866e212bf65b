//! Command handlers for the Pages context.
//!
//! Each handler validates the command, then applies it to the store. Change
//! notification is left to the caller so a handler's result never depends on
//! the hub.

use apipage_core::command::Command;
use apipage_core::error::StoreError;
use apipage_core::validate::require;
use tracing::info;

use crate::domain::commands::{CreatePage, DeletePage, UpdatePage};
use crate::domain::model::Page;
use crate::domain::store::PageStore;

fn validate_content(title: &str, text: &str) -> Result<(), StoreError> {
    require("title", title)?;
    require("text", text)
}

fn log_command(command: &dyn Command) {
    info!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        page_id = command.record_id(),
        "handling page command"
    );
}

/// Handles `CreatePage`: stores a new page and returns it with its assigned
/// id and timestamps.
///
/// # Errors
///
/// Returns `StoreError::Validation` for a blank title or text, or the store's
/// error.
pub async fn handle_create_page(
    command: &CreatePage,
    store: &dyn PageStore,
) -> Result<Page, StoreError> {
    log_command(command);
    validate_content(&command.title, &command.text)?;
    store
        .create(Page::new(command.title.clone(), command.text.clone()))
        .await
}

/// Handles `UpdatePage`: replaces the page's title and body.
///
/// # Errors
///
/// Returns `StoreError::Validation` for a blank title or text,
/// `StoreError::NotFound` when the page does not exist, or the store's error.
pub async fn handle_update_page(
    command: &UpdatePage,
    store: &dyn PageStore,
) -> Result<Page, StoreError> {
    log_command(command);
    validate_content(&command.title, &command.text)?;
    let mut page = Page::new(command.title.clone(), command.text.clone());
    page.id = command.page_id;
    store.update(page).await
}

/// Handles `DeletePage`. Deleting a page that does not exist succeeds.
///
/// # Errors
///
/// Returns the store's error.
pub async fn handle_delete_page(
    command: &DeletePage,
    store: &dyn PageStore,
) -> Result<(), StoreError> {
    log_command(command);
    store.delete(command.page_id).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use apipage_core::error::StoreError;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_create_page, handle_delete_page, handle_update_page,
    };
    use crate::domain::commands::{CreatePage, DeletePage, UpdatePage};
    use crate::domain::store::PageStore;
    use crate::memory::InMemoryPageStore;
    use apipage_test_support::{FixedClock, SteppingClock};

    fn store() -> InMemoryPageStore {
        let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        InMemoryPageStore::new(Arc::new(FixedClock(fixed_now)))
    }

    fn create(title: &str, text: &str) -> CreatePage {
        CreatePage {
            correlation_id: Uuid::new_v4(),
            title: title.to_owned(),
            text: text.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_handle_create_page_assigns_id_and_timestamps() {
        // Arrange
        let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let store = store();

        // Act
        let page = handle_create_page(&create("page1", "Page 1 text"), &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(page.id, 1);
        assert_eq!(page.title, "page1");
        assert_eq!(page.text, "Page 1 text");
        assert_eq!(page.created_at, fixed_now);
        assert_eq!(page.updated_at, fixed_now);
    }

    #[tokio::test]
    async fn test_handle_create_page_rejects_missing_title() {
        // Arrange
        let store = store();

        // Act
        let result = handle_create_page(&create("", "Page 1 text"), &store).await;

        // Assert
        match result.unwrap_err() {
            StoreError::Validation(message) => assert!(message.contains("title")),
            other => panic!("expected Validation, got {other:?}"),
        }
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_handle_update_page_replaces_content() {
        // Arrange
        let start = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let store = InMemoryPageStore::new(Arc::new(SteppingClock::new(start)));
        let created = handle_create_page(&create("page1", "old"), &store)
            .await
            .unwrap();
        let command = UpdatePage {
            correlation_id: Uuid::new_v4(),
            page_id: created.id,
            title: "page1 edited".to_owned(),
            text: "new".to_owned(),
        };

        // Act
        let updated = handle_update_page(&command, &store).await.unwrap();

        // Assert
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "page1 edited");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn test_handle_update_page_for_missing_page_is_not_found() {
        // Arrange
        let store = store();
        let command = UpdatePage {
            correlation_id: Uuid::new_v4(),
            page_id: 45,
            title: "title".to_owned(),
            text: "text".to_owned(),
        };

        // Act
        let result = handle_update_page(&command, &store).await;

        // Assert
        assert!(matches!(result, Err(StoreError::NotFound(45))));
    }

    #[tokio::test]
    async fn test_handle_delete_page_removes_page() {
        // Arrange
        let store = store();
        let created = handle_create_page(&create("page1", "text"), &store)
            .await
            .unwrap();
        let command = DeletePage {
            correlation_id: Uuid::new_v4(),
            page_id: created.id,
        };

        // Act
        handle_delete_page(&command, &store).await.unwrap();

        // Assert
        assert!(
            PageStore::get_by_id(&store, created.id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
