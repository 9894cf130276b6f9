//! Terminal engine facade
//!
//! [`TerminalEngine`] offers one surface over either backend: output,
//! submitted-line listeners, history, working directory, environment and
//! theme. The backend is chosen by probing the emulator library once at
//! construction; that choice never changes for the life of the engine.

use std::collections::BTreeMap;

use serde_json::Value;
use wos_storage::SharedStore;

use crate::ansi::{AnsiColor, RESET};
use crate::backend::{
    BackendKind, EmulatorLibrary, FallbackBackend, NoEmulator, PrimaryBackend, TerminalBackend,
};
use crate::key::Key;
use crate::line::LineEvent;
use crate::options::{TerminalOptions, HISTORY_KEY};
use crate::theme::{self, Palette};

type LineListener = Box<dyn FnMut(&str)>;

/// One terminal instance
pub struct TerminalEngine {
    backend: Box<dyn TerminalBackend>,
    options: TerminalOptions,
    listeners: Vec<LineListener>,
    cwd: String,
    env: BTreeMap<String, String>,
    theme: &'static Palette,
    store: Option<SharedStore>,
    destroyed: bool,
}

impl TerminalEngine {
    /// Create an engine, using the emulator if `library` can open one
    pub fn new(options: TerminalOptions, library: &dyn EmulatorLibrary) -> Self {
        let backend: Box<dyn TerminalBackend> = match PrimaryBackend::open(library, &options) {
            Ok(primary) => {
                tracing::debug!(addons = primary.addons().len(), "terminal using emulator");
                Box::new(primary)
            }
            Err(e) => {
                tracing::warn!(error = %e, "emulator not available, using fallback renderer");
                Box::new(FallbackBackend::new(&options))
            }
        };
        Self::with_backend(options, backend)
    }

    /// Create an engine on the fallback renderer
    pub fn fallback(options: TerminalOptions) -> Self {
        Self::new(options, &NoEmulator)
    }

    fn with_backend(options: TerminalOptions, backend: Box<dyn TerminalBackend>) -> Self {
        let home = format!("/home/{}", options.user);
        let env = BTreeMap::from([
            ("HOME".to_string(), home.clone()),
            ("USER".to_string(), options.user.clone()),
            ("HOSTNAME".to_string(), options.host.clone()),
            ("SHELL".to_string(), "/bin/wsh".to_string()),
            ("TERM".to_string(), "xterm-256color".to_string()),
            ("PWD".to_string(), home.clone()),
        ]);
        let theme = theme::resolve(&options.theme);
        let mut engine = Self {
            backend,
            options,
            listeners: Vec::new(),
            cwd: home,
            env,
            theme,
            store: None,
            destroyed: false,
        };
        engine.backend.set_theme(theme);
        engine.refresh_prompt();
        engine
    }

    /// Attach the store and load persisted history
    pub fn with_store(mut self, store: SharedStore) -> Self {
        if let Some(key) = self.history_key() {
            let entries = wos_storage::coerce_array(store.get(&key))
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                });
            self.backend.line_mut().load_history(entries);
            tracing::debug!(key = %key, entries = self.backend.line().history().len(), "history loaded");
        }
        self.store = Some(store);
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn options(&self) -> &TerminalOptions {
        &self.options
    }

    /// Screen model when running on the fallback renderer
    pub fn screen(&self) -> Option<&FallbackBackend> {
        self.backend.as_fallback()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Submitted lines, oldest first
    pub fn history(&self) -> Vec<String> {
        self.backend.line().history().iter().cloned().collect()
    }

    /// History walk position, -1 when not walking
    pub fn history_index(&self) -> isize {
        self.backend.line().history_index()
    }

    /// Text typed but not yet submitted
    pub fn current_line(&self) -> String {
        self.backend.line().current_line()
    }

    pub fn current_dir(&self) -> &str {
        &self.cwd
    }

    pub fn home_dir(&self) -> &str {
        self.env.get("HOME").map(String::as_str).unwrap_or("/")
    }

    pub fn env(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(String::as_str)
    }

    pub fn environment(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Active palette
    pub fn theme(&self) -> &'static Palette {
        self.theme
    }

    /// Prompt text, `user@host:dir$ ` with ANSI colors
    pub fn prompt_text(&self) -> String {
        format!(
            "{}{}@{}{}:{}{}{}$ ",
            AnsiColor::Green.escape(),
            self.options.user,
            self.options.host,
            RESET,
            AnsiColor::Blue.escape(),
            self.display_dir(),
            RESET
        )
    }

    /// Working directory with the home prefix shown as `~`
    pub fn display_dir(&self) -> String {
        let home = self.home_dir();
        if self.cwd == home {
            "~".to_string()
        } else if let Some(rest) = self.cwd.strip_prefix(home).filter(|r| r.starts_with('/')) {
            format!("~{}", rest)
        } else {
            self.cwd.clone()
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Append raw text
    pub fn write(&mut self, text: &str) {
        if let Some(backend) = self.live() {
            backend.write(text);
        }
    }

    /// Append text and a line break
    pub fn writeln(&mut self, text: &str) {
        if let Some(backend) = self.live() {
            backend.write(text);
            backend.write("\n");
        }
    }

    /// Write `text` in one color
    pub fn writeln_colored(&mut self, text: &str, color: AnsiColor) {
        let colored = format!("{}{}{}\n", color.escape(), text, RESET);
        self.write(&colored);
    }

    /// Empty the visible buffer; history is kept
    pub fn clear(&mut self) {
        if let Some(backend) = self.live() {
            backend.clear();
        }
    }

    pub fn focus(&mut self) {
        if let Some(backend) = self.live() {
            backend.focus();
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.options.cols = cols;
        self.options.rows = rows;
        if let Some(backend) = self.live() {
            backend.resize(cols, rows);
        }
    }

    /// Show the prompt on a fresh input line
    pub fn show_prompt(&mut self) {
        self.refresh_prompt();
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Subscribe to submitted lines
    ///
    /// Each listener is called once per non-blank Enter with the trimmed
    /// line.
    pub fn on_line(&mut self, listener: impl FnMut(&str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Apply a key press; returns the line if it submitted one
    pub fn handle_key(&mut self, key: Key) -> Option<String> {
        let backend = self.live()?;
        match backend.handle_key(key) {
            LineEvent::Submitted(line) => {
                for listener in &mut self.listeners {
                    listener(&line);
                }
                self.persist_history();
                Some(line)
            }
            _ => None,
        }
    }

    /// Apply a DOM `keydown`; unknown keys are ignored
    pub fn handle_dom_key(&mut self, key: &str, ctrl: bool) -> Option<String> {
        match Key::from_dom(key, ctrl) {
            Ok(key) => self.handle_key(key),
            Err(e) => {
                tracing::trace!(error = %e, "key ignored");
                None
            }
        }
    }

    /// Apply emulator input data
    pub fn handle_data(&mut self, data: &str) -> Vec<String> {
        Key::parse_data(data)
            .into_iter()
            .filter_map(|key| self.handle_key(key))
            .collect()
    }

    /// Insert text as if typed, one character at a time
    ///
    /// Line breaks submit; other control characters are dropped.
    pub fn paste(&mut self, text: &str) -> Vec<String> {
        text.chars()
            .filter_map(|c| match c {
                '\n' => Some(Key::Enter),
                c if c.is_control() => None,
                c => Some(Key::Char(c)),
            })
            .collect::<Vec<_>>()
            .into_iter()
            .filter_map(|key| self.handle_key(key))
            .collect()
    }

    /// Words offered by Tab completion
    pub fn set_completions(&mut self, words: impl IntoIterator<Item = String>) {
        self.backend.line_mut().set_completions(words);
    }

    /// Drop any half-typed input; history is kept
    pub fn reset_input(&mut self) {
        if let Some(backend) = self.live() {
            backend.line_mut().reset();
        }
    }

    pub fn clear_history(&mut self) {
        self.backend.line_mut().clear_history();
        self.persist_history();
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Change the working directory (the caller validates the path)
    pub fn set_current_dir(&mut self, dir: impl Into<String>) {
        self.cwd = dir.into();
        self.env.insert("PWD".to_string(), self.cwd.clone());
        self.refresh_prompt_text();
    }

    pub fn set_env(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.env.insert(name.into(), value.into());
    }

    /// Apply a theme by name; unknown names use the default theme
    pub fn apply_theme(&mut self, name: &str) -> &'static Palette {
        let palette = theme::resolve(name);
        self.theme = palette;
        self.options.theme = palette.name.to_string();
        if let Some(backend) = self.live() {
            backend.set_theme(palette);
        }
        palette
    }

    pub fn set_font_size(&mut self, px: u16) {
        self.options.font_size = px;
        if let Some(backend) = self.live() {
            backend.set_font_size(px);
        }
    }

    /// Dispose the backend; the engine ignores all further calls
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.backend.dispose();
        self.listeners.clear();
        self.destroyed = true;
        tracing::debug!(kind = ?self.backend.kind(), "terminal destroyed");
    }

    fn live(&mut self) -> Option<&mut dyn TerminalBackend> {
        if self.destroyed {
            None
        } else {
            Some(self.backend.as_mut())
        }
    }

    fn refresh_prompt(&mut self) {
        let prompt = self.prompt_text();
        if let Some(backend) = self.live() {
            backend.prompt(&prompt);
        }
    }

    /// Update the prompt text without redrawing a primary backend
    fn refresh_prompt_text(&mut self) {
        if self.kind() == BackendKind::Fallback {
            self.refresh_prompt();
        }
    }

    fn history_key(&self) -> Option<String> {
        self.options
            .history_key
            .as_ref()
            .map(|key| format!("{}.{}", HISTORY_KEY, key))
    }

    fn persist_history(&self) {
        let (Some(store), Some(key)) = (&self.store, self.history_key()) else {
            return;
        };
        let history: Vec<&String> = self.backend.line().history().iter().collect();
        wos_storage::save(store.as_ref(), &key, &history);
    }
}

impl Drop for TerminalEngine {
    fn drop(&mut self) {
        self.destroy();
    }
}
