//! Keyboard input
//!
//! Keys arrive from two places: DOM `keydown` events (fallback backend)
//! and the raw data stream of the emulator (primary backend). Both are
//! decoded into [`Key`] so the line discipline sees one vocabulary.

use crate::error::{TerminalError, TerminalResult};

/// A key press relevant to line editing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Tab,
    /// Ctrl + lowercase letter
    Ctrl(char),
}

impl Key {
    /// Decode a DOM `KeyboardEvent.key` value
    pub fn from_dom(key: &str, ctrl: bool) -> TerminalResult<Key> {
        let named = match key {
            "Enter" => Some(Key::Enter),
            "Backspace" => Some(Key::Backspace),
            "Delete" => Some(Key::Delete),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Home" => Some(Key::Home),
            "End" => Some(Key::End),
            "Tab" => Some(Key::Tab),
            _ => None,
        };
        if let Some(key) = named {
            return Ok(key);
        }

        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if ctrl => Ok(Key::Ctrl(c.to_ascii_lowercase())),
            (Some(c), None) if !c.is_control() => Ok(Key::Char(c)),
            _ => Err(TerminalError::UnknownKey(key.to_string())),
        }
    }

    /// Decode a chunk of emulator input data
    ///
    /// Recognises CR/LF, DEL and BS, the arrow/home/end CSI sequences,
    /// C0 control characters as Ctrl+letter, and printable characters.
    /// Anything else is dropped.
    pub fn parse_data(data: &str) -> Vec<Key> {
        let mut keys = Vec::new();
        let mut chars = data.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\r' | '\n' => keys.push(Key::Enter),
                '\x7f' | '\x08' => keys.push(Key::Backspace),
                '\t' => keys.push(Key::Tab),
                '\x1b' => {
                    if chars.peek() != Some(&'[') {
                        continue;
                    }
                    chars.next();
                    let mut params = String::new();
                    let mut last = None;
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            last = Some(c);
                            break;
                        }
                        params.push(c);
                    }
                    let key = match (params.as_str(), last) {
                        ("", Some('A')) => Some(Key::Up),
                        ("", Some('B')) => Some(Key::Down),
                        ("", Some('C')) => Some(Key::Right),
                        ("", Some('D')) => Some(Key::Left),
                        ("", Some('H')) | ("1", Some('~')) => Some(Key::Home),
                        ("", Some('F')) | ("4", Some('~')) => Some(Key::End),
                        ("3", Some('~')) => Some(Key::Delete),
                        _ => None,
                    };
                    keys.extend(key);
                }
                '\x01'..='\x1a' => {
                    let letter = (b'a' + (c as u8 - 1)) as char;
                    keys.push(Key::Ctrl(letter));
                }
                c if !c.is_control() => keys.push(Key::Char(c)),
                _ => {}
            }
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dom() {
        assert_eq!(Key::from_dom("a", false), Ok(Key::Char('a')));
        assert_eq!(Key::from_dom("C", true), Ok(Key::Ctrl('c')));
        assert_eq!(Key::from_dom("ArrowUp", false), Ok(Key::Up));
        assert_eq!(
            Key::from_dom("F5", false),
            Err(TerminalError::UnknownKey("F5".into()))
        );
    }

    #[test]
    fn test_parse_data() {
        assert_eq!(
            Key::parse_data("ls\r"),
            vec![Key::Char('l'), Key::Char('s'), Key::Enter]
        );
        assert_eq!(
            Key::parse_data("\x1b[A\x1b[B\x1b[3~\x7f"),
            vec![Key::Up, Key::Down, Key::Delete, Key::Backspace]
        );
        assert_eq!(Key::parse_data("\x03\x0c"), vec![Key::Ctrl('c'), Key::Ctrl('l')]);
    }

    #[test]
    fn test_parse_data_drops_unknown_sequences() {
        assert_eq!(Key::parse_data("\x1b[15~x\x1bO"), vec![Key::Char('x'), Key::Char('O')]);
    }
}
