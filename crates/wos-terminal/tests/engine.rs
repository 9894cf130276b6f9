//! Terminal Engine Integration Tests
//!
//! Drives the engine through both backends with a scripted emulator.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use wos_storage::{KeyValueStore, MemoryStore, SharedStore};
use wos_terminal::{
    theme, Addon, BackendKind, EmulatorLibrary, EmulatorSession, Key, Palette, TerminalEngine,
    TerminalError, TerminalOptions, TerminalResult, HISTORY_KEY, MAX_HISTORY,
};

// =============================================================================
// Scripted emulator
// =============================================================================

#[derive(Default)]
struct EmulatorLog {
    output: String,
    theme: Option<&'static str>,
    clears: usize,
    disposed: bool,
}

struct ScriptedSession {
    log: Rc<RefCell<EmulatorLog>>,
}

impl EmulatorSession for ScriptedSession {
    fn write(&mut self, data: &str) {
        self.log.borrow_mut().output.push_str(data);
    }
    fn clear(&mut self) {
        self.log.borrow_mut().clears += 1;
    }
    fn focus(&mut self) {}
    fn resize(&mut self, _cols: u16, _rows: u16) {}
    fn set_theme(&mut self, palette: &Palette) {
        self.log.borrow_mut().theme = Some(palette.name);
    }
    fn set_font_size(&mut self, _px: u16) {}
    fn load_addon(&mut self, addon: Addon) -> TerminalResult<()> {
        match addon {
            Addon::Fit => Ok(()),
            Addon::WebLinks => Err(TerminalError::AddonFailed {
                addon: addon.name(),
                reason: "script 404".into(),
            }),
        }
    }
    fn dispose(&mut self) {
        self.log.borrow_mut().disposed = true;
    }
}

struct ScriptedLibrary {
    log: Rc<RefCell<EmulatorLog>>,
    broken: bool,
}

impl EmulatorLibrary for ScriptedLibrary {
    fn open(&self, _options: &TerminalOptions) -> TerminalResult<Box<dyn EmulatorSession>> {
        if self.broken {
            return Err(TerminalError::EmulatorFailed("constructor threw".into()));
        }
        Ok(Box::new(ScriptedSession {
            log: self.log.clone(),
        }))
    }
}

fn primary() -> (TerminalEngine, Rc<RefCell<EmulatorLog>>) {
    let log = Rc::new(RefCell::new(EmulatorLog::default()));
    let library = ScriptedLibrary {
        log: log.clone(),
        broken: false,
    };
    (TerminalEngine::new(TerminalOptions::default(), &library), log)
}

fn fallback() -> TerminalEngine {
    TerminalEngine::fallback(TerminalOptions::default())
}

fn type_line(engine: &mut TerminalEngine, text: &str) -> Option<String> {
    for c in text.chars() {
        engine.handle_key(Key::Char(c));
    }
    engine.handle_key(Key::Enter)
}

fn recorder(engine: &mut TerminalEngine) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    engine.on_line(move |line| sink.borrow_mut().push(line.to_string()));
    seen
}

// =============================================================================
// Backend selection
// =============================================================================

#[test]
fn test_primary_selected_when_library_opens() {
    let (engine, log) = primary();
    assert_eq!(engine.kind(), BackendKind::Primary);
    assert!(engine.screen().is_none());
    assert_eq!(log.borrow().theme, Some("vs-code-dark"));
}

#[test]
fn test_broken_library_falls_back() {
    let log = Rc::new(RefCell::new(EmulatorLog::default()));
    let library = ScriptedLibrary { log, broken: true };
    let engine = TerminalEngine::new(TerminalOptions::default(), &library);
    assert_eq!(engine.kind(), BackendKind::Fallback);
}

// =============================================================================
// Line submission
// =============================================================================

/// Keystrokes l, s, Enter on the fallback renderer submit "ls".
#[test]
fn test_fallback_submits_typed_line() {
    let mut engine = fallback();
    let seen = recorder(&mut engine);

    engine.handle_key(Key::Char('l'));
    engine.handle_key(Key::Char('s'));
    engine.handle_key(Key::Enter);

    assert_eq!(*seen.borrow(), vec!["ls"]);
}

#[test]
fn test_blank_and_aborted_lines_do_not_notify() {
    let mut engine = fallback();
    let seen = recorder(&mut engine);

    assert_eq!(type_line(&mut engine, "    "), None);
    engine.handle_key(Key::Char('x'));
    engine.handle_key(Key::Ctrl('c'));
    assert_eq!(engine.current_line(), "");
    assert!(seen.borrow().is_empty());

    let screen = engine.screen().unwrap().visible_text();
    assert_eq!(screen.last().map(String::as_str), Some("user@webos:~$ x^C"));
}

#[test]
fn test_clear_keeps_history() {
    let mut engine = fallback();
    type_line(&mut engine, "echo one");
    engine.writeln("one");
    engine.clear();

    assert!(engine.screen().unwrap().visible_text().is_empty());
    assert_eq!(engine.history(), vec!["echo one"]);
}

/// Identical keystrokes produce identical submissions on both backends.
#[test]
fn test_backends_submit_identically() {
    let script: Vec<Key> = "help\n  echo  hi  \n\n"
        .chars()
        .map(|c| if c == '\n' { Key::Enter } else { Key::Char(c) })
        .chain([
            Key::Up,
            Key::Up,
            Key::Enter,
            Key::Char('x'),
            Key::Ctrl('c'),
            Key::Char('l'),
            Key::Char('s'),
            Key::Left,
            Key::Backspace,
            Key::End,
            Key::Enter,
        ])
        .collect();

    let run = |engine: &mut TerminalEngine| -> Vec<String> {
        let seen = recorder(engine);
        engine.writeln("banner");
        for key in &script {
            engine.handle_key(*key);
            engine.write("out");
        }
        engine.clear();
        let result = seen.borrow().clone();
        result
    };

    let (mut primary, _) = primary();
    let mut fallback = fallback();
    let a = run(&mut primary);
    let b = run(&mut fallback);

    assert_eq!(a, vec!["help", "echo  hi", "help", "s"]);
    assert_eq!(a, b);
    assert_eq!(primary.history(), fallback.history());
}

#[test]
fn test_primary_decodes_emulator_data() {
    let (mut engine, log) = primary();
    let lines = engine.handle_data("pwd\r\x1b[Aw\x7f\x7fd\r");
    assert_eq!(lines, vec!["pwd", "pwd"]);
    assert!(log.borrow().output.contains("pwd"));
}

// =============================================================================
// History
// =============================================================================

#[test]
fn test_history_navigation_from_empty() {
    let mut engine = fallback();
    for cmd in ["a", "b", "c", "d"] {
        type_line(&mut engine, cmd);
    }

    let mut recalled = Vec::new();
    for _ in 0..4 {
        engine.handle_key(Key::Up);
        recalled.push(engine.current_line());
    }
    assert_eq!(recalled, vec!["d", "c", "b", "a"]);

    for _ in 0..3 {
        engine.handle_key(Key::Down);
    }
    assert_eq!(engine.current_line(), "d");
    engine.handle_key(Key::Down);
    assert_eq!(engine.current_line(), "");
    assert_eq!(engine.history_index(), -1);
}

#[test]
fn test_history_persisted_per_engine() {
    let backing = Rc::new(MemoryStore::new());
    let store: SharedStore = backing.clone();
    let options = TerminalOptions::default().with_history_key("tab-1");

    let mut engine = TerminalEngine::fallback(options.clone()).with_store(store.clone());
    type_line(&mut engine, "ls");
    type_line(&mut engine, "pwd");
    drop(engine);

    let key = format!("{}.tab-1", HISTORY_KEY);
    assert_eq!(backing.get(&key), Some(serde_json::json!(["ls", "pwd"])));

    let engine = TerminalEngine::fallback(options).with_store(store.clone());
    assert_eq!(engine.history(), vec!["ls", "pwd"]);

    let other = TerminalEngine::fallback(TerminalOptions::default().with_history_key("tab-2"))
        .with_store(store);
    assert!(other.history().is_empty());
}

#[test]
fn test_corrupt_history_reads_empty() {
    let backing = Rc::new(MemoryStore::new());
    backing.set(&format!("{}.main", HISTORY_KEY), serde_json::json!({"not": "a list"}));
    let engine = TerminalEngine::fallback(TerminalOptions::default().with_history_key("main"))
        .with_store(backing);
    assert!(engine.history().is_empty());
}

proptest! {
    /// Submitting more than the bound keeps exactly the newest entries.
    #[test]
    fn prop_history_bounded(count in 1usize..250) {
        let mut engine = fallback();
        for i in 0..count {
            type_line(&mut engine, &format!("cmd-{i}"));
        }

        let history = engine.history();
        let expected = count.min(MAX_HISTORY);
        prop_assert_eq!(history.len(), expected);
        prop_assert_eq!(history.first().cloned(), Some(format!("cmd-{}", count - expected)));
        prop_assert_eq!(history.last().cloned(), Some(format!("cmd-{}", count - 1)));
    }
}

#[test]
fn test_history_150_keeps_newest_100() {
    let mut engine = fallback();
    for i in 0..150 {
        type_line(&mut engine, &format!("command {i}"));
    }
    let history = engine.history();
    assert_eq!(history.len(), 100);
    assert_eq!(history[0], "command 50");
    assert_eq!(history[99], "command 149");
}

#[test]
fn test_fallback_hides_osc_sequences() {
    let mut engine = fallback();
    engine.writeln("\x1b]0;My Title\x07hello");
    engine.writeln("\x1b]8;;https://example.com\x1b\\link\x1b]8;;\x1b\\");

    assert_eq!(engine.screen().unwrap().visible_text(), vec!["hello", "link"]);
}

// =============================================================================
// Themes
// =============================================================================

#[test]
fn test_unknown_theme_uses_default_palette() {
    let mut engine = fallback();
    engine.apply_theme("dracula");
    let palette = engine.apply_theme("nonexistent-theme");

    assert_eq!(palette, &theme::VS_CODE_DARK);
    let screen = engine.screen().unwrap();
    assert_eq!(screen.palette().background, "#1e1e1e");
    assert_eq!(screen.palette().foreground, "#d4d4d4");
}

#[test]
fn test_theme_reaches_emulator() {
    let (mut engine, log) = primary();
    engine.apply_theme("solarized-dark");
    assert_eq!(log.borrow().theme, Some("solarized-dark"));
}

// =============================================================================
// Destroy
// =============================================================================

#[test]
fn test_destroy_disposes_emulator() {
    let (mut engine, log) = primary();
    engine.destroy();
    assert!(log.borrow().disposed);

    let before = log.borrow().output.len();
    engine.writeln("ignored");
    assert_eq!(log.borrow().output.len(), before);
}

#[test]
fn test_ctrl_l_clears_emulator() {
    let (mut engine, log) = primary();
    engine.handle_key(Key::Ctrl('l'));
    assert_eq!(log.borrow().clears, 1);
}
