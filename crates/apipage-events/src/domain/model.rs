//! Event record, its fields and its list projection.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use apipage_core::error::StoreError;
use apipage_core::listing::{Comparator, Listable, contains_ignore_case};
use apipage_core::memory::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where an analytics event is emitted from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Emitted by the web frontend.
    #[default]
    Frontend,
    /// Emitted by a native client.
    Client,
}

impl EventKind {
    /// The wire and storage tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frontend" => Ok(Self::Frontend),
            "client" => Ok(Self::Client),
            other => Err(StoreError::Validation(format!("unknown event type: {other}"))),
        }
    }
}

/// A parameter attached to an event. Owned by its event and ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Parameter name; may be null.
    #[serde(default)]
    pub key: Option<String>,
    /// Free-form data type label.
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the parameter must be sent.
    #[serde(default)]
    pub required: bool,
    /// What the parameter carries.
    pub description: String,
}

/// A tracked analytics event definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Store-assigned identifier (1-based).
    #[serde(default)]
    pub id: u64,
    pub constant: String,
    #[serde(default)]
    pub label: Option<String>,
    pub value: String,
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: EventKind,
    /// Replaced as a whole on update.
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// Event projection returned by list queries: no description, no fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListItem {
    pub id: u64,
    pub constant: String,
    pub label: Option<String>,
    pub value: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EventListItem {
    fn label_or_empty(&self) -> &str {
        self.label.as_deref().unwrap_or_default()
    }
}

impl From<&Event> for EventListItem {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            constant: event.constant.clone(),
            label: event.label.clone(),
            value: event.value.clone(),
            kind: event.kind,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

fn by_id(a: &EventListItem, b: &EventListItem) -> Ordering {
    a.id.cmp(&b.id)
}

fn by_constant(a: &EventListItem, b: &EventListItem) -> Ordering {
    a.constant.cmp(&b.constant)
}

fn by_label(a: &EventListItem, b: &EventListItem) -> Ordering {
    a.label_or_empty().cmp(b.label_or_empty())
}

fn by_value(a: &EventListItem, b: &EventListItem) -> Ordering {
    a.value.cmp(&b.value)
}

fn by_created_at(a: &EventListItem, b: &EventListItem) -> Ordering {
    a.created_at.cmp(&b.created_at)
}

fn by_updated_at(a: &EventListItem, b: &EventListItem) -> Ordering {
    a.updated_at.cmp(&b.updated_at)
}

impl Listable for EventListItem {
    fn matches_query(&self, needle: &str) -> bool {
        contains_ignore_case(&self.constant, needle)
            || contains_ignore_case(self.label_or_empty(), needle)
            || contains_ignore_case(&self.value, needle)
    }

    fn kind(&self) -> Option<&str> {
        Some(self.kind.as_str())
    }

    fn comparator(key: &str) -> Option<Comparator<Self>> {
        match key {
            "id" => Some(by_id),
            "constant" => Some(by_constant),
            "label" => Some(by_label),
            "value" => Some(by_value),
            "createdAt" => Some(by_created_at),
            "updatedAt" => Some(by_updated_at),
            _ => None,
        }
    }
}

impl Record for Event {
    type ListItem = EventListItem;
    const RESOURCE: &'static str = "event";

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

    fn to_list_item(&self) -> EventListItem {
        EventListItem::from(self)
    }
}
