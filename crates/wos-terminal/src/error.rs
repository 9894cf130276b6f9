//! Error types for the terminal engine
//!
//! Nothing here reaches the user as a failure: a missing emulator selects
//! the fallback backend and a failed addon is logged and skipped.

/// Errors that can occur while setting up or driving a terminal backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalError {
    /// The emulator library is not loaded in this environment
    EmulatorUnavailable(String),

    /// The emulator library is present but refused to open a session
    EmulatorFailed(String),

    /// An optional emulator addon could not be loaded
    AddonFailed {
        /// Addon that failed
        addon: &'static str,
        /// Reason reported by the library
        reason: String,
    },

    /// A key name from the host was not recognised
    UnknownKey(String),

    /// The engine has been destroyed
    Destroyed,
}

impl std::fmt::Display for TerminalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmulatorUnavailable(msg) => write!(f, "emulator unavailable: {}", msg),
            Self::EmulatorFailed(msg) => write!(f, "emulator failed to open: {}", msg),
            Self::AddonFailed { addon, reason } => {
                write!(f, "addon '{}' failed to load: {}", addon, reason)
            }
            Self::UnknownKey(key) => write!(f, "unknown key: {}", key),
            Self::Destroyed => write!(f, "terminal destroyed"),
        }
    }
}

impl std::error::Error for TerminalError {}

/// Result type alias for terminal operations
pub type TerminalResult<T> = Result<T, TerminalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TerminalError::AddonFailed {
            addon: "fit",
            reason: "not found".into(),
        };
        assert_eq!(err.to_string(), "addon 'fit' failed to load: not found");
        assert_eq!(TerminalError::Destroyed.to_string(), "terminal destroyed");
    }
}
