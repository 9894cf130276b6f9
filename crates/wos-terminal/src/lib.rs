//! Terminal Engine for the Web Desktop
//!
//! A terminal facade with two interchangeable backends:
//! - An emulator library session (xterm.js in the browser), used when the
//!   library loads
//! - A built-in fallback renderer with its own ANSI color subset
//!
//! Both backends share one [`LineDiscipline`], so line submission, history
//! navigation and editing keys behave the same on either.
//!
//! ## Architecture
//!
//! - [`engine`]: The [`TerminalEngine`] facade
//! - [`backend`]: [`TerminalBackend`] strategy, primary and fallback backends
//! - [`line`]: Input buffer, cursor editing, bounded history
//! - [`key`]: Key decoding from DOM events and emulator data
//! - [`ansi`]: SGR color parsing
//! - [`theme`]: Built-in palettes
//! - [`options`]: Construction options and persisted preferences
//!
//! ## Example
//!
//! ```rust
//! use wos_terminal::{Key, TerminalEngine, TerminalOptions};
//!
//! let mut term = TerminalEngine::fallback(TerminalOptions::default());
//! for c in "ls".chars() {
//!     term.handle_key(Key::Char(c));
//! }
//! assert_eq!(term.handle_key(Key::Enter).as_deref(), Some("ls"));
//! ```

pub mod ansi;
pub mod backend;
pub mod engine;
pub mod error;
pub mod key;
pub mod line;
pub mod options;
pub mod theme;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::*;

pub use ansi::{AnsiColor, AnsiParser, Span};
pub use backend::{
    Addon, BackendKind, EmulatorLibrary, EmulatorSession, FallbackBackend, NoEmulator,
    PrimaryBackend, TerminalBackend,
};
pub use engine::TerminalEngine;
pub use error::{TerminalError, TerminalResult};
pub use key::Key;
pub use line::{LineDiscipline, LineEvent, MAX_HISTORY};
pub use options::{TerminalOptions, TerminalPreferences, HISTORY_KEY, PREFERENCES_KEY};
pub use theme::{Palette, DEFAULT_THEME};
