//! Browser `localStorage` store.

use serde_json::Value;

use crate::error::{StorageError, StorageResult};
use crate::store::KeyValueStore;

/// Store backed by `window.localStorage`, with every key namespaced.
pub struct LocalStore {
    prefix: String,
}

impl LocalStore {
    /// Create a store whose keys are stored as `{prefix}.{key}`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn storage(&self) -> StorageResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}.{}", self.prefix, key)
    }
}

impl KeyValueStore for LocalStore {
    fn read(&self, key: &str) -> StorageResult<Option<Value>> {
        let storage = self.storage()?;
        let text = storage
            .get_item(&self.full_key(key))
            .map_err(|_| StorageError::Unavailable)?;
        match text {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| StorageError::corrupt(key, e.to_string())),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: Value) -> StorageResult<()> {
        let storage = self.storage()?;
        let text =
            serde_json::to_string(&value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        storage
            .set_item(&self.full_key(key), &text)
            .map_err(|e| StorageError::WriteFailed(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let storage = self.storage()?;
        storage
            .remove_item(&self.full_key(key))
            .map_err(|e| StorageError::WriteFailed(format!("{:?}", e)))
    }
}
