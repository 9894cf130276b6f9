//! Terminal backends
//!
//! A [`TerminalBackend`] renders output and turns key presses into
//! submitted lines. Two implementations exist:
//!
//! - [`PrimaryBackend`]: drives a terminal emulator library session
//! - [`FallbackBackend`]: a self-contained line renderer used when no
//!   emulator is available
//!
//! Which one an engine uses is decided once, at construction.

mod fallback;
mod primary;

pub use fallback::{FallbackBackend, InputLine, ScreenLine, ScreenSnapshot};
pub use primary::{Addon, EmulatorLibrary, EmulatorSession, NoEmulator, PrimaryBackend};

use serde::Serialize;

use crate::key::Key;
use crate::line::{LineDiscipline, LineEvent};
use crate::theme::Palette;

/// Which backend an engine is using
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Primary,
    Fallback,
}

/// Rendering and input strategy behind the terminal facade
pub trait TerminalBackend {
    fn kind(&self) -> BackendKind;

    /// Append raw text (may contain ANSI sequences)
    fn write(&mut self, text: &str);

    /// Empty the visible buffer; history is kept
    fn clear(&mut self);

    fn focus(&mut self);

    fn resize(&mut self, cols: u16, rows: u16);

    fn set_theme(&mut self, palette: &'static Palette);

    fn set_font_size(&mut self, px: u16);

    /// Set the prompt and show it on a fresh input line
    fn prompt(&mut self, prompt: &str);

    /// Feed a key through the line discipline and render the result
    fn handle_key(&mut self, key: Key) -> LineEvent;

    /// Shared line editing state
    fn line(&self) -> &LineDiscipline;

    fn line_mut(&mut self) -> &mut LineDiscipline;

    /// Release native resources and empty the container
    fn dispose(&mut self);

    /// Access the fallback renderer's screen model
    fn as_fallback(&self) -> Option<&FallbackBackend> {
        None
    }
}
