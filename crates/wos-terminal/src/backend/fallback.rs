//! Self-contained renderer used when no emulator is available
//!
//! Output is kept as a bounded list of colored lines plus a partial line
//! still being written. The input line (prompt, typed text, cursor) is
//! modelled separately, the way it is drawn below the output.

use std::collections::VecDeque;

use serde::Serialize;

use super::{BackendKind, TerminalBackend};
use crate::ansi::{AnsiParser, Segment, Span};
use crate::key::Key;
use crate::line::{LineDiscipline, LineEvent};
use crate::options::TerminalOptions;
use crate::theme::{self, Palette};

/// One finished output line
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScreenLine {
    pub spans: Vec<Span>,
}

impl ScreenLine {
    /// Text without colors
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// The live input line
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InputLine {
    pub prompt: Vec<Span>,
    pub text: String,
    /// Cursor position in chars within `text`
    pub cursor: usize,
    pub cursor_blink: bool,
}

/// Everything the host needs to paint the terminal
#[derive(Clone, Debug, Serialize)]
pub struct ScreenSnapshot<'a> {
    pub lines: &'a VecDeque<ScreenLine>,
    pub pending: &'a [Span],
    pub input: InputLine,
    pub palette: &'static Palette,
    pub font_size: u16,
    pub font_family: &'a str,
    pub focused: bool,
}

pub struct FallbackBackend {
    lines: VecDeque<ScreenLine>,
    pending: Vec<Span>,
    parser: AnsiParser,
    scrollback: usize,
    line: LineDiscipline,
    prompt: String,
    palette: &'static Palette,
    font_size: u16,
    font_family: String,
    cursor_blink: bool,
    cols: u16,
    rows: u16,
    focused: bool,
}

impl FallbackBackend {
    pub fn new(options: &TerminalOptions) -> Self {
        Self {
            lines: VecDeque::new(),
            pending: Vec::new(),
            parser: AnsiParser::new(),
            scrollback: options.scrollback.max(1),
            line: LineDiscipline::new(),
            prompt: String::new(),
            palette: theme::resolve(&options.theme),
            font_size: options.font_size,
            font_family: options.font_family.clone(),
            cursor_blink: options.cursor_blink,
            cols: options.cols,
            rows: options.rows,
            focused: false,
        }
    }

    /// Finished output lines, oldest first
    pub fn lines(&self) -> &VecDeque<ScreenLine> {
        &self.lines
    }

    /// Output written since the last newline
    pub fn pending(&self) -> &[Span] {
        &self.pending
    }

    /// Plain text of every finished line, then the pending line if any
    pub fn visible_text(&self) -> Vec<String> {
        let mut text: Vec<String> = self.lines.iter().map(ScreenLine::text).collect();
        if !self.pending.is_empty() {
            text.push(self.pending.iter().map(|s| s.text.as_str()).collect());
        }
        text
    }

    pub fn input_line(&self) -> InputLine {
        InputLine {
            prompt: AnsiParser::spans(&self.prompt),
            text: self.line.current_line(),
            cursor: self.line.cursor(),
            cursor_blink: self.cursor_blink,
        }
    }

    pub fn palette(&self) -> &'static Palette {
        self.palette
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn snapshot(&self) -> ScreenSnapshot<'_> {
        ScreenSnapshot {
            lines: &self.lines,
            pending: &self.pending,
            input: self.input_line(),
            palette: self.palette,
            font_size: self.font_size,
            font_family: &self.font_family,
            focused: self.focused,
        }
    }

    fn push_span(&mut self, span: Span) {
        match self.pending.last_mut() {
            Some(last) if last.color == span.color => last.text.push_str(&span.text),
            _ => self.pending.push(span),
        }
    }

    fn commit(&mut self) {
        let spans = std::mem::take(&mut self.pending);
        self.lines.push_back(ScreenLine { spans });
        while self.lines.len() > self.scrollback {
            self.lines.pop_front();
        }
    }

    /// Copy the prompt and `text` into the output, as a real terminal
    /// leaves the submitted line on screen
    fn echo_input(&mut self, text: &str) {
        for span in AnsiParser::spans(&self.prompt) {
            self.push_span(span);
        }
        if !text.is_empty() {
            self.push_span(Span::plain(text));
        }
        self.commit();
    }
}

impl TerminalBackend for FallbackBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Fallback
    }

    fn write(&mut self, text: &str) {
        for segment in self.parser.feed(text) {
            match segment {
                Segment::Span(span) => self.push_span(span),
                Segment::Newline => self.commit(),
            }
        }
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.pending.clear();
        self.parser.reset();
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    fn set_theme(&mut self, palette: &'static Palette) {
        self.palette = palette;
    }

    fn set_font_size(&mut self, px: u16) {
        self.font_size = px;
    }

    fn prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    fn handle_key(&mut self, key: Key) -> LineEvent {
        let before = self.line.current_line();
        let event = self.line.handle_key(key);
        match &event {
            LineEvent::Submitted(_) | LineEvent::Blank => self.echo_input(&before),
            LineEvent::Aborted(text) => {
                let echoed = format!("{}^C", text);
                self.echo_input(&echoed);
            }
            LineEvent::ClearScreen => self.clear(),
            LineEvent::Candidates(words) => {
                self.echo_input(&before);
                self.push_span(Span::plain(words.join("  ")));
                self.commit();
            }
            LineEvent::Edited | LineEvent::Ignored => {}
        }
        tracing::trace!(?key, "fallback key");
        event
    }

    fn line(&self) -> &LineDiscipline {
        &self.line
    }

    fn line_mut(&mut self) -> &mut LineDiscipline {
        &mut self.line
    }

    fn dispose(&mut self) {
        self.clear();
        self.line.reset();
        self.prompt.clear();
        self.focused = false;
    }

    fn as_fallback(&self) -> Option<&FallbackBackend> {
        Some(self)
    }
}
