//! Generic in-memory record store.
//!
//! Reference model of what a persistent store must do, and the backend used
//! when no database is configured. Records live in insertion order behind a
//! reader/writer lock; reads share the lock, mutations hold it exclusively for
//! the whole read-modify-write.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::Clock;
use crate::error::StoreError;
use crate::listing::{self, ListPage, ListQuery, Listable};

/// A storable resource with a store-assigned identity.
pub trait Record: Clone + Send + Sync + 'static {
    /// Reduced projection returned by list queries.
    type ListItem: Listable;

    /// Resource name used in log fields.
    const RESOURCE: &'static str;

    /// The store-assigned identifier.
    fn id(&self) -> u64;

    /// Creation timestamp.
    fn created_at(&self) -> DateTime<Utc>;

    /// Overwrites the store-managed identity fields.
    fn assign(&mut self, id: u64, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);

    /// Builds the list projection.
    fn to_list_item(&self) -> Self::ListItem;
}

/// Tuning knobs for a [`MemoryStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStoreConfig {
    /// Maximum number of records; `create` fails once it is reached.
    pub max_records: Option<usize>,
}

struct State<R> {
    records: Vec<R>,
    next_id: u64,
}

/// Thread-safe in-memory store for one resource type.
pub struct MemoryStore<R> {
    clock: Arc<dyn Clock>,
    config: MemoryStoreConfig,
    state: RwLock<State<R>>,
}

impl<R> fmt::Debug for MemoryStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R: Record> MemoryStore<R> {
    /// Creates an empty, unbounded store.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(clock, MemoryStoreConfig::default())
    }

    /// Creates an empty store with explicit limits.
    #[must_use]
    pub fn with_config(clock: Arc<dyn Clock>, config: MemoryStoreConfig) -> Self {
        Self {
            clock,
            config,
            state: RwLock::new(State {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State<R>>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Persistence(format!("{} store lock poisoned", R::RESOURCE)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State<R>>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Persistence(format!("{} store lock poisoned", R::RESOURCE)))
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.records.len())
    }

    /// Returns `true` when the store holds no records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Looks up a record. Absence is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the lock is poisoned.
    pub fn get_by_id(&self, id: u64) -> Result<Option<R>, StoreError> {
        debug!(resource = R::RESOURCE, id, "memory store get_by_id");
        let state = self.read()?;
        Ok(state.records.iter().find(|r| r.id() == id).cloned())
    }

    /// Lists record projections through the list engine.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownSortKey` for an unregistered sort key and
    /// `StoreError::Persistence` if the lock is poisoned.
    pub fn list(&self, query: &ListQuery) -> Result<ListPage<R::ListItem>, StoreError> {
        let items: Vec<R::ListItem> = {
            let state = self.read()?;
            state.records.iter().map(Record::to_list_item).collect()
        };
        listing::list(items, query)
    }

    /// Stores a new record, assigning its id and both timestamps.
    ///
    /// Ids start at 1 and increase by one per creation; a deleted id is never
    /// handed out again.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` when the configured capacity is
    /// reached or the lock is poisoned.
    pub fn create(&self, mut record: R) -> Result<R, StoreError> {
        let mut state = self.write()?;
        if let Some(max) = self.config.max_records {
            if state.records.len() >= max {
                return Err(StoreError::Persistence(format!(
                    "{} store is full ({max} records)",
                    R::RESOURCE
                )));
            }
        }

        let now = self.clock.now();
        let id = state.next_id;
        record.assign(id, now, now);
        state.next_id += 1;
        state.records.push(record.clone());

        debug!(resource = R::RESOURCE, id, "memory store created record");
        Ok(record)
    }

    /// Replaces a stored record wholesale, keeping its id and creation time
    /// and refreshing its update time.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` when no record has `record.id()`, and
    /// `StoreError::Persistence` if the lock is poisoned.
    pub fn update(&self, mut record: R) -> Result<R, StoreError> {
        let id = record.id();
        let mut state = self.write()?;
        let Some(slot) = state.records.iter_mut().find(|r| r.id() == id) else {
            return Err(StoreError::NotFound(id));
        };

        record.assign(id, slot.created_at(), self.clock.now());
        slot.clone_from(&record);

        debug!(resource = R::RESOURCE, id, "memory store updated record");
        Ok(record)
    }

    /// Removes a record, preserving the order of the remaining ones.
    /// Deleting an absent id succeeds without changing anything.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the lock is poisoned.
    pub fn delete(&self, id: u64) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if let Some(index) = state.records.iter().position(|r| r.id() == id) {
            state.records.remove(index);
            debug!(resource = R::RESOURCE, id, "memory store deleted record");
        }
        Ok(())
    }
}
