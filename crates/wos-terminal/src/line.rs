//! Line discipline: input buffer, cursor editing and command history
//!
//! Both backends feed keys through the same [`LineDiscipline`], so
//! submission, history walking and editing behave identically whichever
//! backend renders them.

use std::collections::VecDeque;

use crate::key::Key;

/// Maximum command history entries; the oldest is dropped beyond this
pub const MAX_HISTORY: usize = 100;

/// Outcome of one key press
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineEvent {
    /// Buffer or cursor changed
    Edited,
    /// Enter on non-blank input; carries the trimmed line
    Submitted(String),
    /// Enter on blank input
    Blank,
    /// Ctrl+C; carries the abandoned input
    Aborted(String),
    /// Ctrl+L
    ClearScreen,
    /// Tab matched several completions
    Candidates(Vec<String>),
    /// Key had no effect
    Ignored,
}

/// Editable input line with history
#[derive(Clone, Debug, Default)]
pub struct LineDiscipline {
    buffer: Vec<char>,
    /// Cursor position in chars
    cursor: usize,
    /// Oldest first
    history: VecDeque<String>,
    /// Offset from the newest entry while walking history
    history_pos: Option<usize>,
    completions: Vec<String>,
}

impl LineDiscipline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current input text
    pub fn current_line(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Cursor position in chars
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Submitted lines, oldest first
    pub fn history(&self) -> &VecDeque<String> {
        &self.history
    }

    /// History walk position: offset from the newest entry, or -1 when
    /// not walking
    pub fn history_index(&self) -> isize {
        self.history_pos.map(|p| p as isize).unwrap_or(-1)
    }

    /// Replace history, keeping the newest [`MAX_HISTORY`] entries
    pub fn load_history(&mut self, entries: impl IntoIterator<Item = String>) {
        self.history.clear();
        for entry in entries {
            self.push_history(entry);
        }
        self.history_pos = None;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.history_pos = None;
    }

    /// Words offered by Tab completion of the first word
    pub fn set_completions(&mut self, words: impl IntoIterator<Item = String>) {
        self.completions = words.into_iter().collect();
        self.completions.sort();
        self.completions.dedup();
    }

    /// Drop the current input
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.history_pos = None;
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: Key) -> LineEvent {
        match key {
            Key::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += 1;
                LineEvent::Edited
            }
            Key::Enter => self.submit(),
            Key::Backspace => {
                if self.cursor == 0 {
                    return LineEvent::Ignored;
                }
                self.cursor -= 1;
                self.buffer.remove(self.cursor);
                LineEvent::Edited
            }
            Key::Delete => {
                if self.cursor >= self.buffer.len() {
                    return LineEvent::Ignored;
                }
                self.buffer.remove(self.cursor);
                LineEvent::Edited
            }
            Key::Left => self.move_cursor(self.cursor.saturating_sub(1)),
            Key::Right => self.move_cursor((self.cursor + 1).min(self.buffer.len())),
            Key::Home | Key::Ctrl('a') => self.move_cursor(0),
            Key::End | Key::Ctrl('e') => self.move_cursor(self.buffer.len()),
            Key::Up => self.history_up(),
            Key::Down => self.history_down(),
            Key::Tab => self.complete(),
            Key::Ctrl('c') => {
                let abandoned = self.current_line();
                self.reset();
                LineEvent::Aborted(abandoned)
            }
            Key::Ctrl('l') => LineEvent::ClearScreen,
            Key::Ctrl('u') => {
                self.buffer.drain(..self.cursor);
                self.cursor = 0;
                LineEvent::Edited
            }
            Key::Ctrl('k') => {
                self.buffer.truncate(self.cursor);
                LineEvent::Edited
            }
            Key::Ctrl(_) => LineEvent::Ignored,
        }
    }

    fn submit(&mut self) -> LineEvent {
        let line = self.current_line().trim().to_string();
        self.reset();
        if line.is_empty() {
            return LineEvent::Blank;
        }
        self.push_history(line.clone());
        LineEvent::Submitted(line)
    }

    fn push_history(&mut self, entry: String) {
        self.history.push_back(entry);
        while self.history.len() > MAX_HISTORY {
            self.history.pop_front();
        }
    }

    fn move_cursor(&mut self, to: usize) -> LineEvent {
        if to == self.cursor {
            return LineEvent::Ignored;
        }
        self.cursor = to;
        LineEvent::Edited
    }

    fn set_buffer(&mut self, text: &str) {
        self.buffer = text.chars().collect();
        self.cursor = self.buffer.len();
    }

    fn history_up(&mut self) -> LineEvent {
        if self.history.is_empty() {
            return LineEvent::Ignored;
        }
        let next = match self.history_pos {
            None => 0,
            Some(p) if p + 1 < self.history.len() => p + 1,
            Some(_) => return LineEvent::Ignored,
        };
        self.history_pos = Some(next);
        let entry = self.history[self.history.len() - 1 - next].clone();
        self.set_buffer(&entry);
        LineEvent::Edited
    }

    fn history_down(&mut self) -> LineEvent {
        match self.history_pos {
            None => LineEvent::Ignored,
            Some(0) => {
                self.history_pos = None;
                self.set_buffer("");
                LineEvent::Edited
            }
            Some(p) => {
                self.history_pos = Some(p - 1);
                let entry = self.history[self.history.len() - p].clone();
                self.set_buffer(&entry);
                LineEvent::Edited
            }
        }
    }

    fn complete(&mut self) -> LineEvent {
        let prefix: String = self.buffer[..self.cursor].iter().collect();
        if prefix.contains(char::is_whitespace) || self.cursor != self.buffer.len() {
            return LineEvent::Ignored;
        }
        let matches: Vec<String> = self
            .completions
            .iter()
            .filter(|w| w.starts_with(&prefix))
            .cloned()
            .collect();

        match matches.as_slice() {
            [] => LineEvent::Ignored,
            [only] => {
                let completed = format!("{} ", only);
                self.set_buffer(&completed);
                LineEvent::Edited
            }
            [first, rest @ ..] => {
                let common = rest.iter().fold(first.chars().count(), |len, w| {
                    first
                        .chars()
                        .zip(w.chars())
                        .take(len)
                        .take_while(|(a, b)| a == b)
                        .count()
                });
                let common: String = first.chars().take(common).collect();
                if common.chars().count() > prefix.chars().count() {
                    self.set_buffer(&common);
                    LineEvent::Edited
                } else {
                    LineEvent::Candidates(matches.to_vec())
                }
            }
        }
    }
}
