//! Backend driving a terminal emulator library

use super::{BackendKind, TerminalBackend};
use crate::error::{TerminalError, TerminalResult};
use crate::key::Key;
use crate::line::{LineDiscipline, LineEvent};
use crate::options::TerminalOptions;
use crate::theme::{self, Palette};

/// Optional emulator enhancements
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Addon {
    /// Fit the grid to the container size
    Fit,
    /// Make URLs in the output clickable
    WebLinks,
}

impl Addon {
    pub const ALL: [Addon; 2] = [Addon::Fit, Addon::WebLinks];

    pub fn name(self) -> &'static str {
        match self {
            Addon::Fit => "fit",
            Addon::WebLinks => "web-links",
        }
    }
}

/// A terminal emulator library that may or may not be present
pub trait EmulatorLibrary {
    /// Open a session, or fail if the library is missing or broken
    fn open(&self, options: &TerminalOptions) -> TerminalResult<Box<dyn EmulatorSession>>;
}

/// One live emulator instance
pub trait EmulatorSession {
    fn write(&mut self, data: &str);
    fn clear(&mut self);
    fn focus(&mut self);
    fn resize(&mut self, cols: u16, rows: u16);
    fn set_theme(&mut self, palette: &Palette);
    fn set_font_size(&mut self, px: u16);
    fn load_addon(&mut self, addon: Addon) -> TerminalResult<()>;
    fn dispose(&mut self);
}

/// Probe result for environments without an emulator
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEmulator;

impl EmulatorLibrary for NoEmulator {
    fn open(&self, _options: &TerminalOptions) -> TerminalResult<Box<dyn EmulatorSession>> {
        Err(TerminalError::EmulatorUnavailable(
            "no terminal emulator library loaded".to_string(),
        ))
    }
}

/// Line editing on top of an emulator session
///
/// The emulator does no line editing of its own: every key is applied to
/// the [`LineDiscipline`] and the input line is redrawn with escape
/// sequences.
pub struct PrimaryBackend {
    session: Box<dyn EmulatorSession>,
    line: LineDiscipline,
    prompt: String,
    addons: Vec<Addon>,
    disposed: bool,
}

impl PrimaryBackend {
    /// Open a session and load addons best-effort
    pub fn open(library: &dyn EmulatorLibrary, options: &TerminalOptions) -> TerminalResult<Self> {
        let mut session = library.open(options)?;

        let mut addons = Vec::new();
        for addon in Addon::ALL {
            match session.load_addon(addon) {
                Ok(()) => addons.push(addon),
                Err(e) => tracing::warn!(addon = addon.name(), error = %e, "emulator addon skipped"),
            }
        }
        session.set_theme(theme::resolve(&options.theme));
        session.set_font_size(options.font_size);
        if addons.contains(&Addon::Fit) {
            session.resize(options.cols, options.rows);
        }

        Ok(Self {
            session,
            line: LineDiscipline::new(),
            prompt: String::new(),
            addons,
            disposed: false,
        })
    }

    /// Addons that loaded successfully
    pub fn addons(&self) -> &[Addon] {
        &self.addons
    }

    fn redraw(&mut self) {
        let text = self.line.current_line();
        let back = text.chars().count() - self.line.cursor();
        let mut out = format!("\r\x1b[K{}{}", self.prompt, text);
        if back > 0 {
            out.push_str(&format!("\x1b[{}D", back));
        }
        self.session.write(&out);
    }
}

impl TerminalBackend for PrimaryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Primary
    }

    fn write(&mut self, text: &str) {
        // The emulator needs CRLF to return to column 0
        let normalized = text.replace("\r\n", "\n").replace('\n', "\r\n");
        self.session.write(&normalized);
    }

    fn clear(&mut self) {
        self.session.clear();
    }

    fn focus(&mut self) {
        self.session.focus();
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.session.resize(cols, rows);
    }

    fn set_theme(&mut self, palette: &'static Palette) {
        self.session.set_theme(palette);
    }

    fn set_font_size(&mut self, px: u16) {
        self.session.set_font_size(px);
    }

    fn prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
        self.redraw();
    }

    fn handle_key(&mut self, key: Key) -> LineEvent {
        let event = self.line.handle_key(key);
        match &event {
            LineEvent::Edited => self.redraw(),
            LineEvent::Submitted(_) => self.session.write("\r\n"),
            LineEvent::Blank => {
                self.session.write("\r\n");
                self.redraw();
            }
            LineEvent::Aborted(_) => {
                self.session.write("^C\r\n");
                self.redraw();
            }
            LineEvent::ClearScreen => {
                self.session.clear();
                self.redraw();
            }
            LineEvent::Candidates(words) => {
                self.session.write(&format!("\r\n{}\r\n", words.join("  ")));
                self.redraw();
            }
            LineEvent::Ignored => {}
        }
        event
    }

    fn line(&self) -> &LineDiscipline {
        &self.line
    }

    fn line_mut(&mut self) -> &mut LineDiscipline {
        &mut self.line
    }

    fn dispose(&mut self) {
        if !self.disposed {
            self.session.dispose();
            self.disposed = true;
        }
    }
}
