//! Terminal App Integration Tests
//!
//! Drives the tabbed terminal through a wired system: commands reaching
//! the window manager, shared theme, persisted preferences and history,
//! and the AI fallback.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use wos_apps::{
    AdvancedTerminalApp, AiCompletion, AiResponder, AppError, AppRegistry, CommandOutcome, System,
};
use wos_desktop::{ActivityEvent, DesktopSettings, ManualClock};
use wos_storage::{KeyValueStore, MemoryStore, SharedStore};
use wos_terminal::{theme, NoEmulator, TerminalOptions, PREFERENCES_KEY};

// =============================================================================
// Helpers
// =============================================================================

fn terminal(store: Option<SharedStore>) -> AdvancedTerminalApp {
    AdvancedTerminalApp::new(
        TerminalOptions::default(),
        Rc::new(NoEmulator),
        Rc::new(AppRegistry::new()),
        Rc::new(ManualClock::new(0.0)),
        store,
    )
}

fn system(clock: &ManualClock) -> System {
    System::new(
        DesktopSettings::default(),
        Rc::new(clock.clone()),
        None,
        Rc::new(NoEmulator),
    )
}

fn output(app: &AdvancedTerminalApp) -> Vec<String> {
    app.active_tab().engine().screen().unwrap().visible_text()
}

/// How the scripted assistant answers
#[derive(Clone, Copy, PartialEq)]
enum Script {
    Answer,
    Fail,
    /// Keep the responder until the test answers it
    Defer,
}

struct ScriptedAi {
    prompts: RefCell<Vec<String>>,
    deferred: RefCell<Vec<AiResponder>>,
    script: Script,
}

impl ScriptedAi {
    fn new(script: Script) -> Rc<Self> {
        Rc::new(Self {
            prompts: RefCell::new(Vec::new()),
            deferred: RefCell::new(Vec::new()),
            script,
        })
    }

    fn take_responder(&self) -> AiResponder {
        self.deferred.borrow_mut().remove(0)
    }
}

impl AiCompletion for ScriptedAi {
    fn get_response(&self, prompt: &str, _include_context: bool, reply: AiResponder) {
        self.prompts.borrow_mut().push(prompt.to_string());
        match self.script {
            Script::Answer => reply.respond(Ok("Use 'ls -la' to list hidden files.".into())),
            Script::Fail => reply.respond(Err(AppError::AiFailed("timeout".into()))),
            Script::Defer => self.deferred.borrow_mut().push(reply),
        }
    }
}

// =============================================================================
// Commands reaching the desktop
// =============================================================================

#[test]
fn test_open_command_opens_window() {
    let clock = ManualClock::new(0.0);
    let mut system = system(&clock);

    let outcome = system.terminal_mut().execute_command("OPEN Notes");
    assert_eq!(outcome, CommandOutcome::Done);

    let windows = system.windows().borrow();
    assert!(windows.contains("notes"));
    assert_eq!(windows.focused_window(), Some("notes"));
    drop(windows);

    assert!(matches!(
        system.activity().events().as_slice(),
        [ActivityEvent::Opened { app_id, .. }] if app_id == "notes"
    ));
    assert_eq!(
        output(system.terminal()).last().map(String::as_str),
        Some("Opening Notes...")
    );
}

#[test]
fn test_open_unknown_app_is_printed() {
    let clock = ManualClock::new(0.0);
    let mut system = system(&clock);

    assert_eq!(
        system.terminal_mut().execute_command("open solitaire"),
        CommandOutcome::Failed
    );
    assert!(system.windows().borrow().is_empty());
    let out = output(system.terminal());
    assert!(out.contains(&"open: unknown app: solitaire".to_string()));
    assert!(out.contains(
        &"Available apps: browser, code-editor, music, notes, tasks, terminal".to_string()
    ));
}

#[test]
fn test_code_opens_editor() {
    let clock = ManualClock::new(0.0);
    let mut system = system(&clock);
    system.terminal_mut().execute_command("code main.rs");
    assert!(system.windows().borrow().contains("code-editor"));
}

#[test]
fn test_unknown_command_never_panics() {
    let mut app = terminal(None);
    for line in ["rm -rf /", "sudo", "ai", "ai unknown", "cd", "ls /etc/hosts", "  "] {
        app.execute_command(line);
    }
    assert_eq!(app.tabs().len(), 1);
}

#[test]
fn test_typed_keys_dispatch_command() {
    let mut app = terminal(None);
    for key in ["p", "w", "d"] {
        assert_eq!(app.handle_dom_key(key, false), None);
    }
    assert_eq!(app.handle_dom_key("Enter", false), Some(CommandOutcome::Done));
    assert_eq!(output(&app).last().map(String::as_str), Some("/home/user"));
}

// =============================================================================
// Shared theme and preferences
// =============================================================================

#[test]
fn test_theme_reaches_every_tab() {
    let mut app = terminal(None);
    app.new_tab();
    app.new_tab();
    app.switch_tab(2);

    let outcome = app.execute_command("theme matrix-green");
    assert_eq!(outcome, CommandOutcome::ThemeChanged(&theme::MATRIX_GREEN));

    for tab in app.tabs() {
        assert_eq!(tab.engine().theme().name, "matrix-green");
        assert_eq!(
            tab.engine().screen().unwrap().palette().name,
            "matrix-green"
        );
    }

    let later = app.new_tab();
    assert_eq!(app.tab(later).unwrap().engine().theme().name, "matrix-green");
}

#[test]
fn test_unknown_theme_command_changes_nothing() {
    let mut app = terminal(None);
    app.set_theme("dracula");
    assert_eq!(app.execute_command("theme sparkle"), CommandOutcome::Failed);
    assert_eq!(app.theme().name, "dracula");
}

#[test]
fn test_set_theme_unknown_uses_default() {
    let mut app = terminal(None);
    app.set_theme("one-dark");
    let palette = app.set_theme("nonexistent-theme");
    assert_eq!(palette.name, "vs-code-dark");
    assert_eq!(
        app.active_tab().engine().screen().unwrap().palette().background,
        "#1e1e1e"
    );
}

#[test]
fn test_preferences_persist_across_restart() {
    let backing = Rc::new(MemoryStore::new());
    let store: SharedStore = backing.clone();

    let mut app = terminal(Some(store.clone()));
    app.execute_command("theme retro-amber");
    app.set_font_size(18);
    app.destroy();

    assert_eq!(
        backing.get(PREFERENCES_KEY),
        Some(serde_json::json!({"theme": "retro-amber", "font_size": 18}))
    );

    let restarted = terminal(Some(store));
    assert_eq!(restarted.theme().name, "retro-amber");
    assert_eq!(restarted.font_size(), 18);
    let screen = restarted.active_tab().engine().screen().unwrap();
    assert_eq!(screen.font_size(), 18);
}

#[test]
fn test_history_is_per_tab_and_persisted() {
    let store: SharedStore = Rc::new(MemoryStore::new());

    let mut app = terminal(Some(store.clone()));
    app.paste("whoami\n");
    app.new_tab();
    app.paste("date\n");
    drop(app);

    let restarted = terminal(Some(store));
    assert_eq!(restarted.active_tab().engine().history(), vec!["whoami"]);
}

// =============================================================================
// AI
// =============================================================================

#[test]
fn test_ai_answer_is_printed() {
    let ai = ScriptedAi::new(Script::Answer);
    let mut app = terminal(None).with_ai(ai.clone());

    assert_eq!(app.execute_command("ai explain ls"), CommandOutcome::Done);
    assert_eq!(
        *ai.prompts.borrow(),
        vec!["Explain this command or concept concisely: ls"]
    );
    assert_eq!(
        output(&app).last().map(String::as_str),
        Some("Use 'ls -la' to list hidden files.")
    );
}

#[test]
fn test_ai_failure_falls_back_to_canned_text() {
    let ai = ScriptedAi::new(Script::Fail);
    let mut app = terminal(None).with_ai(ai);

    assert_eq!(app.execute_command("ai debug segfault"), CommandOutcome::Done);
    let out = output(&app);
    let n = out.len();
    assert_eq!(out[n - 2], "AI request failed: timeout (showing offline help)");
    assert_eq!(
        out[n - 1],
        "Check the command spelling, run 'help' for usage, and verify paths with 'ls' and 'pwd'."
    );
}

#[test]
fn test_deferred_answer_reaches_asking_tab() {
    let ai = ScriptedAi::new(Script::Defer);
    let mut app = terminal(None).with_ai(ai.clone());
    let asking = app.active_tab().id();

    assert_eq!(app.execute_command("ai explain grep"), CommandOutcome::Pending);
    assert_eq!(app.pending_ai(), 1);
    assert_eq!(app.poll_ai(), 0);

    // The terminal stays usable while the assistant thinks
    app.new_tab();
    assert_eq!(app.execute_command("pwd"), CommandOutcome::Done);

    ai.take_responder()
        .respond(Ok("grep searches text for a pattern.".into()));
    assert_eq!(app.poll_ai(), 1);
    assert_eq!(app.pending_ai(), 0);

    let asked = app.tab(asking).unwrap().engine().screen().unwrap().visible_text();
    assert_eq!(
        asked.last().map(String::as_str),
        Some("grep searches text for a pattern.")
    );
    assert!(!output(&app).contains(&"grep searches text for a pattern.".to_string()));
}

#[test]
fn test_deferred_rejection_falls_back() {
    let ai = ScriptedAi::new(Script::Defer);
    let clock = ManualClock::new(0.0);
    let mut system = system(&clock).with_ai(ai.clone());

    system.terminal_mut().execute_command("ai suggest free disk space");
    ai.take_responder()
        .respond(Err(AppError::AiFailed("rate limited".into())));
    assert_eq!(system.tick(), 1);

    let out = output(system.terminal());
    let n = out.len();
    assert_eq!(out[n - 2], "AI request failed: rate limited (showing offline help)");
    assert_eq!(
        out[n - 1],
        "Try 'ls' to look around, 'cd <dir>' to move, 'open <app>' to launch an app."
    );
}

#[test]
fn test_closing_tab_abandons_its_request() {
    let ai = ScriptedAi::new(Script::Defer);
    let mut app = terminal(None).with_ai(ai.clone());
    let asking = app.active_tab().id();
    app.execute_command("ai debug permission denied");
    app.new_tab();

    assert!(app.close_tab(asking));
    assert_eq!(app.pending_ai(), 0);
    ai.take_responder().respond(Ok("late".into()));
    assert_eq!(app.poll_ai(), 0);
    assert!(!output(&app).contains(&"late".to_string()));
}

// =============================================================================
// Tab invariants
// =============================================================================

#[derive(Clone, Debug)]
enum TabOp {
    New,
    Close(usize),
    Switch(usize),
    Next,
    Type(usize),
}

fn tab_op() -> impl Strategy<Value = TabOp> {
    prop_oneof![
        Just(TabOp::New),
        (0usize..6).prop_map(TabOp::Close),
        (0usize..6).prop_map(TabOp::Switch),
        Just(TabOp::Next),
        (0usize..3).prop_map(TabOp::Type),
    ]
}

proptest! {
    /// At least one tab always exists and exactly one is active.
    #[test]
    fn prop_exactly_one_active_tab(ops in prop::collection::vec(tab_op(), 1..40)) {
        let mut app = terminal(None);
        for op in ops {
            let ids: Vec<_> = app.tabs().iter().map(|t| t.id()).collect();
            match op {
                TabOp::New => {
                    app.new_tab();
                }
                TabOp::Close(i) => {
                    app.close_tab(ids[i % ids.len()]);
                }
                TabOp::Switch(i) => {
                    app.switch_tab(ids[i % ids.len()]);
                }
                TabOp::Next => {
                    app.next_tab();
                }
                TabOp::Type(i) => {
                    app.paste(["pwd\n", "cd ..\n", "ls\n"][i]);
                }
            }

            prop_assert!(!app.tabs().is_empty());
            let active: Vec<_> = app.tabs().iter().filter(|t| t.is_active()).collect();
            prop_assert_eq!(active.len(), 1);
            prop_assert_eq!(active[0].display(), "block");
            prop_assert!(app
                .tabs()
                .iter()
                .filter(|t| !t.is_active())
                .all(|t| t.display() == "none"));
        }
    }
}
