//! Error types for the storage layer.

/// Errors from the fallible internals of a store.
///
/// These never reach callers of [`crate::KeyValueStore::get`]; they are
/// logged and the read degrades to "absent".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The backing storage is not available (e.g. private browsing)
    Unavailable,

    /// A stored value could not be parsed
    Corrupt {
        /// Key holding the value
        key: String,
        /// Parser message
        reason: String,
    },

    /// Serializing a value failed
    Serialization(String),

    /// The backend rejected a write (quota, permissions)
    WriteFailed(String),
}

impl StorageError {
    /// Create a corrupt-value error.
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Corrupt { key, reason } => write!(f, "corrupt value at '{}': {}", key, reason),
            Self::Serialization(msg) => write!(f, "serialization error: {}", msg),
            Self::WriteFailed(msg) => write!(f, "write failed: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
