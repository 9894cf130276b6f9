//! Persistence collaborator for the web desktop
//!
//! Every piece of desktop state that survives a reload (window positions,
//! terminal history, terminal preferences) goes through a small key-value
//! contract:
//!
//! - `get(key)` never fails; a miss or a corrupt value reads as "absent"
//! - `set(key, value)` is fire-and-forget; write failures are logged
//!
//! Values are JSON (`serde_json::Value`) so that the same records can be
//! written to browser `localStorage` or held in memory for tests.
//!
//! ## Modules
//!
//! - [`store`]: The [`KeyValueStore`] trait and typed helpers
//! - [`memory`]: In-memory store used by tests and headless hosts
//! - [`error`]: Error types for the fallible internals
//! - `local` (feature `wasm`): `window.localStorage` backed store

pub mod error;
pub mod memory;
pub mod store;

#[cfg(feature = "wasm")]
pub mod local;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use store::{coerce_array, load_or, save, KeyValueStore, SharedStore};

#[cfg(feature = "wasm")]
pub use local::LocalStore;
