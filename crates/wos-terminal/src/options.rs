//! Terminal configuration and persisted preferences

use serde::{Deserialize, Serialize};
use wos_storage::KeyValueStore;

use crate::theme::DEFAULT_THEME;

/// Store key for [`TerminalPreferences`]
pub const PREFERENCES_KEY: &str = "terminal.preferences";

/// Store key prefix for per-engine command history
pub const HISTORY_KEY: &str = "terminal.history";

/// Construction options for a terminal engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalOptions {
    pub font_size: u16,
    pub font_family: String,
    pub theme: String,
    pub cursor_blink: bool,
    /// Output lines kept by the fallback renderer
    pub scrollback: usize,
    pub cols: u16,
    pub rows: u16,
    pub user: String,
    pub host: String,
    /// Persist history under `terminal.history.<key>` when set
    pub history_key: Option<String>,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            font_size: 14,
            font_family: "'Cascadia Code', 'Fira Code', Consolas, monospace".to_string(),
            theme: DEFAULT_THEME.to_string(),
            cursor_blink: true,
            scrollback: 1000,
            cols: 80,
            rows: 24,
            user: "user".to_string(),
            host: "webos".to_string(),
            history_key: None,
        }
    }
}

impl TerminalOptions {
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    pub fn with_font_size(mut self, px: u16) -> Self {
        self.font_size = px;
        self
    }

    pub fn with_history_key(mut self, key: impl Into<String>) -> Self {
        self.history_key = Some(key.into());
        self
    }

    /// Apply saved preferences over these options
    pub fn with_preferences(mut self, prefs: &TerminalPreferences) -> Self {
        self.theme = prefs.theme.clone();
        self.font_size = prefs.font_size;
        self
    }
}

/// Settings shared by every terminal and kept across sessions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalPreferences {
    pub theme: String,
    pub font_size: u16,
}

impl Default for TerminalPreferences {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            font_size: 14,
        }
    }
}

impl TerminalPreferences {
    /// Read from the store; defaults on miss or a corrupt value
    pub fn load(store: &dyn KeyValueStore) -> Self {
        wos_storage::load_or(store, PREFERENCES_KEY, Self::default())
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        wos_storage::save(store, PREFERENCES_KEY, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wos_storage::MemoryStore;

    #[test]
    fn test_preferences_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(TerminalPreferences::load(&store), TerminalPreferences::default());

        let prefs = TerminalPreferences {
            theme: "dracula".into(),
            font_size: 16,
        };
        prefs.save(&store);
        assert_eq!(TerminalPreferences::load(&store), prefs);
    }

    #[test]
    fn test_partial_preferences_fill_defaults() {
        let store = MemoryStore::new();
        store.insert_raw(PREFERENCES_KEY, r#"{"theme":"one-dark"}"#);
        let prefs = TerminalPreferences::load(&store);
        assert_eq!(prefs.theme, "one-dark");
        assert_eq!(prefs.font_size, 14);
    }

    #[test]
    fn test_options_with_preferences() {
        let prefs = TerminalPreferences {
            theme: "matrix-green".into(),
            font_size: 18,
        };
        let opts = TerminalOptions::default().with_preferences(&prefs);
        assert_eq!(opts.theme, "matrix-green");
        assert_eq!(opts.font_size, 18);
        assert_eq!(opts.cols, 80);
    }
}
