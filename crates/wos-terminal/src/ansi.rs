//! ANSI subset used by the fallback renderer
//!
//! Only SGR foreground colors 30–37 and reset (0, or an empty parameter
//! list) are interpreted. Every other escape sequence, including OSC
//! strings such as titles and hyperlinks, is removed from the output
//! rather than rendered literally.

use serde::Serialize;

/// The eight standard foreground colors
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnsiColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl AnsiColor {
    pub const ALL: [AnsiColor; 8] = [
        AnsiColor::Black,
        AnsiColor::Red,
        AnsiColor::Green,
        AnsiColor::Yellow,
        AnsiColor::Blue,
        AnsiColor::Magenta,
        AnsiColor::Cyan,
        AnsiColor::White,
    ];

    /// Color for an SGR code in 30..=37
    pub fn from_sgr(code: u32) -> Option<AnsiColor> {
        code.checked_sub(30)
            .and_then(|i| Self::ALL.get(i as usize).copied())
    }

    /// Index into a palette's ANSI table
    pub fn index(self) -> usize {
        self as usize
    }

    /// SGR escape selecting this color
    pub fn escape(self) -> String {
        format!("\x1b[{}m", 30 + self.index())
    }
}

/// SGR reset sequence
pub const RESET: &str = "\x1b[0m";

/// A run of text in one color
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    /// `None` renders in the theme foreground
    pub color: Option<AnsiColor>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn colored(text: impl Into<String>, color: AnsiColor) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

/// Incremental parser
///
/// Color state and a partially received escape sequence carry over
/// between [`AnsiParser::feed`] calls, so a sequence split across two
/// writes still parses.
#[derive(Clone, Debug, Default)]
pub struct AnsiParser {
    color: Option<AnsiColor>,
    state: State,
}

#[derive(Clone, Debug, Default, PartialEq)]
enum State {
    #[default]
    Text,
    Escape,
    Csi(String),
    /// Operating system command, up to BEL or `ESC \`
    Osc { esc: bool },
}

impl State {
    /// State after the byte following ESC; two-character escapes are
    /// dropped whole
    fn after_escape(c: char) -> State {
        match c {
            '[' => State::Csi(String::new()),
            ']' => State::Osc { esc: false },
            _ => State::Text,
        }
    }
}

/// Output of one [`AnsiParser::feed`] call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Span(Span),
    Newline,
}

impl AnsiParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color currently in effect
    pub fn color(&self) -> Option<AnsiColor> {
        self.color
    }

    /// Forget color and any partial sequence
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Parse `text` into colored spans and line breaks
    ///
    /// `\r` is dropped; `\n` becomes [`Segment::Newline`]. Adjacent text in
    /// the same color is merged into one span.
    pub fn feed(&mut self, text: &str) -> Vec<Segment> {
        let mut out = Vec::new();
        let mut current = String::new();

        for c in text.chars() {
            match std::mem::take(&mut self.state) {
                State::Text => match c {
                    '\x1b' => {
                        self.flush(&mut current, &mut out);
                        self.state = State::Escape;
                    }
                    '\n' => {
                        self.flush(&mut current, &mut out);
                        out.push(Segment::Newline);
                    }
                    '\r' => {}
                    c if c.is_control() && c != '\t' => {}
                    c => current.push(c),
                },
                State::Escape => self.state = State::after_escape(c),
                State::Csi(mut params) => {
                    if ('\x40'..='\x7e').contains(&c) {
                        if c == 'm' {
                            self.apply_sgr(&params);
                        }
                    } else {
                        params.push(c);
                        self.state = State::Csi(params);
                    }
                }
                State::Osc { esc } => match c {
                    '\x07' => {}
                    '\\' if esc => {}
                    '\x1b' => self.state = State::Osc { esc: true },
                    // ESC not followed by `\` starts a new sequence
                    c if esc => self.state = State::after_escape(c),
                    _ => self.state = State::Osc { esc: false },
                },
            }
        }
        self.flush(&mut current, &mut out);
        out
    }

    /// Parse `text` and drop line structure, for single-line content
    pub fn spans(text: &str) -> Vec<Span> {
        AnsiParser::new()
            .feed(text)
            .into_iter()
            .filter_map(|s| match s {
                Segment::Span(span) => Some(span),
                Segment::Newline => None,
            })
            .collect()
    }

    fn flush(&self, current: &mut String, out: &mut Vec<Segment>) {
        if current.is_empty() {
            return;
        }
        let text = std::mem::take(current);
        out.push(Segment::Span(Span {
            text,
            color: self.color,
        }));
    }

    fn apply_sgr(&mut self, params: &str) {
        for param in params.split(';') {
            match param.parse::<u32>() {
                Ok(0) => self.color = None,
                Err(_) if param.is_empty() => self.color = None,
                Ok(code) => {
                    if let Some(color) = AnsiColor::from_sgr(code) {
                        self.color = Some(color);
                    }
                }
                Err(_) => {}
            }
        }
    }
}

/// Remove every escape sequence, keeping the text
pub fn strip(text: &str) -> String {
    AnsiParser::spans(text)
        .into_iter()
        .map(|s| s.text)
        .collect()
}
