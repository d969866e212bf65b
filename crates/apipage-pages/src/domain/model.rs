//! Page record and its list projection.

use std::cmp::Ordering;

use apipage_core::listing::{Comparator, Listable, contains_ignore_case};
use apipage_core::memory::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A content page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Store-assigned identifier (1-based).
    pub id: u64,
    /// Page title; the only searchable field.
    pub title: String,
    /// Page body.
    pub text: String,
    /// Set once by the store on creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed by the store on every update.
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Builds an unsaved page; the store assigns id and timestamps.
    #[must_use]
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Page projection returned by list queries (no body).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageListItem {
    /// Page identifier.
    pub id: u64,
    /// Page title.
    pub title: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Page> for PageListItem {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id,
            title: page.title.clone(),
            created_at: page.created_at,
            updated_at: page.updated_at,
        }
    }
}

fn by_id(a: &PageListItem, b: &PageListItem) -> Ordering {
    a.id.cmp(&b.id)
}

fn by_title(a: &PageListItem, b: &PageListItem) -> Ordering {
    a.title.cmp(&b.title)
}

fn by_created_at(a: &PageListItem, b: &PageListItem) -> Ordering {
    a.created_at.cmp(&b.created_at)
}

fn by_updated_at(a: &PageListItem, b: &PageListItem) -> Ordering {
    a.updated_at.cmp(&b.updated_at)
}

impl Listable for PageListItem {
    fn matches_query(&self, needle: &str) -> bool {
        contains_ignore_case(&self.title, needle)
    }

    fn comparator(key: &str) -> Option<Comparator<Self>> {
        match key {
            "id" => Some(by_id),
            "title" => Some(by_title),
            "createdAt" => Some(by_created_at),
            "updatedAt" => Some(by_updated_at),
            _ => None,
        }
    }
}

impl Record for Page {
    type ListItem = PageListItem;
    const RESOURCE: &'static str = "page";

    fn id(&self) -> u64 {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn assign(&mut self, id: u64, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
        self.id = id;
        self.created_at = created_at;
        self.updated_at = updated_at;
    }

    fn to_list_item(&self) -> PageListItem {
        PageListItem::from(self)
    }
}
