//! In-memory store for testing and headless hosts.
//!
//! Values are kept as serialized strings so that reads go through the same
//! parse step as a browser store, and a corrupt entry can be injected.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{StorageError, StorageResult};
use crate::store::KeyValueStore;

/// In-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Serialized entries (key -> JSON text)
    entries: RefCell<BTreeMap<String, String>>,
    /// Number of successful writes (lets tests observe debouncing)
    writes: Cell<usize>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text at `key` without validating it (for testing).
    pub fn insert_raw(&self, key: &str, text: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), text.to_string());
    }

    /// Number of writes performed so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Check whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> StorageResult<Option<Value>> {
        let entries = self.entries.borrow();
        let Some(text) = entries.get(key) else {
            return Ok(None);
        };
        serde_json::from_str(text)
            .map(Some)
            .map_err(|e| StorageError::corrupt(key, e.to_string()))
    }

    fn write(&self, key: &str, value: Value) -> StorageResult<()> {
        let text =
            serde_json::to_string(&value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.entries.borrow_mut().insert(key.to_string(), text);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
