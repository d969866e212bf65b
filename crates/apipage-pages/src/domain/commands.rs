//! Commands for the Pages context.

use apipage_core::command::Command;
use uuid::Uuid;

/// Command to create a page.
#[derive(Debug, Clone)]
pub struct CreatePage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Page title.
    pub title: String,
    /// Page body.
    pub text: String,
}

impl Command for CreatePage {
    fn command_type(&self) -> &'static str {
        "pages.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn record_id(&self) -> Option<u64> {
        None
    }
}

/// Command to replace a page's title and body.
#[derive(Debug, Clone)]
pub struct UpdatePage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The page to update.
    pub page_id: u64,
    /// New title.
    pub title: String,
    /// New body.
    pub text: String,
}

impl Command for UpdatePage {
    fn command_type(&self) -> &'static str {
        "pages.update"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn record_id(&self) -> Option<u64> {
        Some(self.page_id)
    }
}

/// Command to delete a page.
#[derive(Debug, Clone)]
pub struct DeletePage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The page to delete.
    pub page_id: u64,
}

impl Command for DeletePage {
    fn command_type(&self) -> &'static str {
        "pages.delete"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn record_id(&self) -> Option<u64> {
        Some(self.page_id)
    }
}
