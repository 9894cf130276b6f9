//! The key-value store contract and typed helpers.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{StorageError, StorageResult};

/// Shared handle to a store.
///
/// The desktop is single-threaded; collaborators share one store through
/// `Rc` and the store uses interior mutability.
pub type SharedStore = Rc<dyn KeyValueStore>;

/// A JSON key-value store.
///
/// Implementors provide the fallible `read`/`write`/`remove` primitives.
/// Callers use [`get`](KeyValueStore::get) and [`set`](KeyValueStore::set),
/// which never fail: errors are logged and reads fall back to `None`.
pub trait KeyValueStore {
    /// Read the raw value at `key`.
    fn read(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Write `value` at `key`.
    fn write(&self, key: &str, value: Value) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Read `key`, treating any failure as a miss.
    fn get(&self, key: &str) -> Option<Value> {
        match self.read(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "storage read failed, using default");
                None
            }
        }
    }

    /// Write `key`, logging (not returning) any failure.
    fn set(&self, key: &str, value: Value) {
        if let Err(e) = self.write(key, value) {
            tracing::warn!(key, error = %e, "storage write failed");
        }
    }
}

/// Load a typed value, returning `default` on miss or decode failure.
pub fn load_or<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    let Some(value) = store.get(key) else {
        return default;
    };
    match serde_json::from_value(value) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value has unexpected shape, using default");
            default
        }
    }
}

/// Serialize and store a typed value (fire-and-forget).
pub fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(json) => store.set(key, json),
        Err(e) => {
            let err = StorageError::Serialization(e.to_string());
            tracing::warn!(key, error = %err, "failed to serialize value for storage");
        }
    }
}

/// Coerce a stored collection to an array.
///
/// Older versions (or a corrupted store) may hold a non-array value where
/// a list is expected. Anything that is not an array reads as empty.
pub fn coerce_array(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::warn!(kind = json_kind(&other), "expected array in storage, resetting to empty");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
