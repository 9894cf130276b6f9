//! Error types for desktop applications
//!
//! Commands never fail outward: these errors are printed into the
//! terminal as colored lines.

/// Errors raised by app-level operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// No app with this id is registered
    UnknownApp(String),

    /// Path does not exist in the simulated filesystem
    NoSuchPath(String),

    /// Path exists but is a file where a directory was expected
    NotADirectory(String),

    /// No AI collaborator is attached
    AiUnavailable,

    /// The AI collaborator returned an error
    AiFailed(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownApp(id) => write!(f, "unknown app: {}", id),
            Self::NoSuchPath(path) => write!(f, "no such file or directory: {}", path),
            Self::NotADirectory(path) => write!(f, "not a directory: {}", path),
            Self::AiUnavailable => write!(f, "AI assistant unavailable"),
            Self::AiFailed(msg) => write!(f, "AI request failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for app operations
pub type AppResult<T> = Result<T, AppError>;
