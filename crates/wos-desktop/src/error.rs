//! Error types for the window manager
//!
//! Public window operations never fail (a missing window is logged and
//! ignored). These errors surface from [`require`] lookups, position
//! decoding and host input.
//!
//! [`require`]: crate::WindowManager::require

use crate::types::WindowId;

/// Errors that can occur in window manager operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopError {
    /// Window with the given ID was not found
    WindowNotFound(WindowId),

    /// A resize handle name from the host was not recognised
    UnknownResizeHandle(String),

    /// Persistence operation failed
    PersistenceError(String),
}

impl std::fmt::Display for DesktopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WindowNotFound(id) => write!(f, "window not found: {}", id),
            Self::UnknownResizeHandle(name) => write!(f, "unknown resize handle: {}", name),
            Self::PersistenceError(msg) => write!(f, "persistence error: {}", msg),
        }
    }
}

impl std::error::Error for DesktopError {}

/// Result type alias for window manager operations
pub type DesktopResult<T> = Result<T, DesktopError>;
