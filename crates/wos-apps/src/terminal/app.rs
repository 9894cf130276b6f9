//! Tabbed terminal app
//!
//! [`AdvancedTerminalApp`] owns one [`TerminalEngine`] per tab and runs
//! submitted lines through the command table. Exactly one tab is active;
//! inactive tabs keep their engine (scrollback, history) and are only
//! hidden. The theme and font size are shared by every tab and persisted.
//!
//! `ai` requests are tracked per tab until the assistant answers; the host
//! calls [`AdvancedTerminalApp::poll_ai`] (or `System::tick`) to print
//! answers that arrived since.

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Serialize;
use wos_desktop::Clock;
use wos_storage::SharedStore;
use wos_terminal::{
    theme, AnsiColor, BackendKind, EmulatorLibrary, Key, Palette, TerminalEngine,
    TerminalOptions, TerminalPreferences,
};

use crate::ai::{self, AiCompletion};
use crate::registry::AppRegistry;
use crate::terminal::commands::{
    self, AwaitingAi, CommandContext, CommandOutcome, CommandRegistry,
};
use crate::terminal::fs::FileTree;

/// Window id the terminal app opens under
pub const TERMINAL_APP: &str = "terminal";

/// Erases the prompt an emulator drew when the engine was created
const ERASE_LINE: &str = "\r\x1b[K";

/// Tab identifier, unique for the life of the app
pub type TabId = u32;

/// One terminal tab
pub struct Tab {
    id: TabId,
    name: String,
    active: bool,
    engine: TerminalEngine,
}

impl Tab {
    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// CSS `display` of the tab's container
    pub fn display(&self) -> &'static str {
        if self.active {
            "block"
        } else {
            "none"
        }
    }

    pub fn engine(&self) -> &TerminalEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TerminalEngine {
        &mut self.engine
    }
}

/// Tab strip entry for the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TabView {
    pub id: TabId,
    pub name: String,
    pub active: bool,
    pub display: &'static str,
    pub backend: BackendKind,
}

/// An unanswered `ai` request and the tab that asked
struct PendingAi {
    tab: TabId,
    request: AwaitingAi,
}

/// Terminal tab multiplexer and command dispatcher
pub struct AdvancedTerminalApp {
    tabs: Vec<Tab>,
    next_id: TabId,
    options: TerminalOptions,
    commands: CommandRegistry,
    files: FileTree,
    apps: Rc<AppRegistry>,
    ai: Option<Rc<dyn AiCompletion>>,
    pending_ai: BTreeMap<u64, PendingAi>,
    next_ai_request: u64,
    library: Rc<dyn EmulatorLibrary>,
    clock: Rc<dyn Clock>,
    store: Option<SharedStore>,
}

impl AdvancedTerminalApp {
    /// Create the app with its first tab
    ///
    /// Saved preferences in `store` override the theme and font size in
    /// `options`.
    pub fn new(
        options: TerminalOptions,
        library: Rc<dyn EmulatorLibrary>,
        apps: Rc<AppRegistry>,
        clock: Rc<dyn Clock>,
        store: Option<SharedStore>,
    ) -> Self {
        let options = match &store {
            Some(store) => options.with_preferences(&TerminalPreferences::load(store.as_ref())),
            None => options,
        };
        let mut app = Self {
            tabs: Vec::new(),
            next_id: 1,
            files: FileTree::new(&options.user),
            options,
            commands: CommandRegistry::builtins(),
            apps,
            ai: None,
            pending_ai: BTreeMap::new(),
            next_ai_request: 1,
            library,
            clock,
            store,
        };
        app.new_tab();
        app
    }

    /// Attach the AI assistant used by `ai` commands
    pub fn with_ai(mut self, ai: Rc<dyn AiCompletion>) -> Self {
        self.ai = Some(ai);
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn tab_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[self.active_index()]
    }

    pub fn active_tab_mut(&mut self) -> &mut Tab {
        let index = self.active_index();
        &mut self.tabs[index]
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Shared palette
    pub fn theme(&self) -> &'static Palette {
        theme::resolve(&self.options.theme)
    }

    pub fn font_size(&self) -> u16 {
        self.options.font_size
    }

    /// `ai` requests still waiting on the assistant
    pub fn pending_ai(&self) -> usize {
        self.pending_ai.len()
    }

    pub fn views(&self) -> Vec<TabView> {
        self.tabs
            .iter()
            .map(|t| TabView {
                id: t.id,
                name: t.name.clone(),
                active: t.active,
                display: t.display(),
                backend: t.engine.kind(),
            })
            .collect()
    }

    fn active_index(&self) -> usize {
        self.tabs.iter().position(|t| t.active).unwrap_or(0)
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }

    // =========================================================================
    // Tabs
    // =========================================================================

    /// Open a tab and make it active
    pub fn new_tab(&mut self) -> TabId {
        let id = self.next_id;
        self.next_id += 1;

        let options = self.options.clone().with_history_key(format!("tab-{}", id));
        let mut engine = TerminalEngine::new(options, self.library.as_ref());
        if let Some(store) = &self.store {
            engine = engine.with_store(store.clone());
        }
        engine.set_completions(self.commands.names().map(String::from));
        engine.write(ERASE_LINE);
        engine.writeln_colored("Welcome to WebOS Terminal", AnsiColor::Cyan);
        engine.writeln("Type 'help' for a list of commands.");
        engine.show_prompt();

        self.tabs.push(Tab {
            id,
            name: format!("Terminal {}", id),
            active: false,
            engine,
        });
        tracing::debug!(tab = id, tabs = self.tabs.len(), "terminal tab opened");
        self.activate(self.tabs.len() - 1);
        id
    }

    /// Close a tab
    ///
    /// The last remaining tab is cleared, its input dropped, and
    /// re-prompted instead of removed. Returns false for an unknown id.
    pub fn close_tab(&mut self, id: TabId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        self.drop_pending_ai(id);
        if self.tabs.len() == 1 {
            let engine = &mut self.tabs[0].engine;
            engine.clear();
            engine.reset_input();
            engine.show_prompt();
            tracing::debug!(tab = id, "last terminal tab cleared");
            return true;
        }

        let was_active = self.tabs[index].active;
        let mut tab = self.tabs.remove(index);
        tab.engine.destroy();
        tracing::debug!(tab = id, tabs = self.tabs.len(), "terminal tab closed");
        if was_active {
            self.activate(index.min(self.tabs.len() - 1));
        }
        true
    }

    /// Make a tab active
    pub fn switch_tab(&mut self, id: TabId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.activate(index);
                true
            }
            None => false,
        }
    }

    /// Activate the tab after the active one, wrapping around
    pub fn next_tab(&mut self) -> TabId {
        let index = (self.active_index() + 1) % self.tabs.len();
        self.activate(index);
        self.tabs[index].id
    }

    /// Rename a tab; blank names are refused
    pub fn rename_tab(&mut self, id: TabId, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.tab_mut(id) {
            Some(tab) => {
                tab.name = name.to_string();
                true
            }
            None => false,
        }
    }

    fn activate(&mut self, index: usize) {
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            tab.active = i == index;
        }
        self.tabs[index].engine.focus();
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Route a key to the active tab, running any submitted line
    pub fn handle_key(&mut self, key: Key) -> Option<CommandOutcome> {
        let line = self.active_tab_mut().engine.handle_key(key)?;
        Some(self.execute_command(&line))
    }

    /// Route a DOM `keydown` to the active tab
    pub fn handle_dom_key(&mut self, key: &str, ctrl: bool) -> Option<CommandOutcome> {
        let line = self.active_tab_mut().engine.handle_dom_key(key, ctrl)?;
        Some(self.execute_command(&line))
    }

    /// Route emulator input data to the active tab
    pub fn handle_data(&mut self, data: &str) -> Vec<CommandOutcome> {
        let lines = self.active_tab_mut().engine.handle_data(data);
        lines.iter().map(|line| self.execute_command(line)).collect()
    }

    /// Type `text` into the active tab
    pub fn paste(&mut self, text: &str) -> Vec<CommandOutcome> {
        let mut outcomes = Vec::new();
        for c in text.chars() {
            let key = match c {
                '\n' => Key::Enter,
                c if c.is_control() => continue,
                c => Key::Char(c),
            };
            if let Some(outcome) = self.handle_key(key) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Run `line` in the active tab, then show a fresh prompt
    ///
    /// A command waiting on the AI assistant returns
    /// [`CommandOutcome::Pending`] and gets its prompt back when the answer
    /// is printed.
    pub fn execute_command(&mut self, line: &str) -> CommandOutcome {
        let index = self.active_index();
        let Self {
            tabs,
            commands,
            files,
            apps,
            ai,
            clock,
            ..
        } = self;
        let mut ctx = CommandContext {
            engine: &mut tabs[index].engine,
            commands,
            files,
            apps: &**apps,
            ai: ai.as_deref(),
            clock: &**clock,
            awaiting: None,
        };
        let outcome = commands::execute(&mut ctx, line);
        let awaiting = ctx.awaiting.take();

        match (outcome, awaiting) {
            (CommandOutcome::Pending, Some(request)) => {
                let id = self.next_ai_request;
                self.next_ai_request += 1;
                let tab = self.tabs[index].id;
                tracing::debug!(request = id, tab, task = request.task.name(), "AI request sent");
                self.pending_ai.insert(id, PendingAi { tab, request });
                // The assistant may already have answered
                self.poll_ai();
                if self.pending_ai.contains_key(&id) {
                    return CommandOutcome::Pending;
                }
                CommandOutcome::Done
            }
            (CommandOutcome::ThemeChanged(palette), _) => {
                self.set_theme(palette.name);
                self.tabs[index].engine.show_prompt();
                outcome
            }
            _ => {
                self.tabs[index].engine.show_prompt();
                outcome
            }
        }
    }

    /// Print every AI answer that has arrived into the tab that asked
    ///
    /// Returns the number of requests settled.
    pub fn poll_ai(&mut self) -> usize {
        let ready: Vec<(u64, crate::AppResult<String>)> = self
            .pending_ai
            .iter()
            .filter_map(|(id, pending)| pending.request.answer.poll().map(|r| (*id, r)))
            .collect();

        let settled = ready.len();
        for (id, result) in ready {
            let Some(PendingAi { tab, request }) = self.pending_ai.remove(&id) else {
                continue;
            };
            let reply = ai::answer(request.task, &request.input, result);
            match self.tab_mut(tab) {
                Some(tab) => {
                    commands::print_reply(&mut tab.engine, &reply);
                    tab.engine.show_prompt();
                }
                None => tracing::debug!(request = id, tab, "AI answer for closed tab dropped"),
            }
        }
        settled
    }

    fn drop_pending_ai(&mut self, tab: TabId) {
        let before = self.pending_ai.len();
        self.pending_ai.retain(|_, p| p.tab != tab);
        let dropped = before - self.pending_ai.len();
        if dropped > 0 {
            tracing::debug!(tab, dropped, "pending AI requests abandoned");
        }
    }

    // =========================================================================
    // Shared settings
    // =========================================================================

    /// Apply a theme to every tab and persist it
    ///
    /// Unknown names use the default theme.
    pub fn set_theme(&mut self, name: &str) -> &'static Palette {
        let palette = theme::resolve(name);
        self.options.theme = palette.name.to_string();
        for tab in &mut self.tabs {
            tab.engine.apply_theme(palette.name);
        }
        tracing::debug!(theme = palette.name, tabs = self.tabs.len(), "terminal theme applied");
        self.save_preferences();
        palette
    }

    /// Apply a font size to every tab and persist it
    pub fn set_font_size(&mut self, px: u16) {
        self.options.font_size = px;
        for tab in &mut self.tabs {
            tab.engine.set_font_size(px);
        }
        self.save_preferences();
    }

    /// Resize every tab; hidden tabs share the window's size
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.options.cols = cols;
        self.options.rows = rows;
        for tab in &mut self.tabs {
            tab.engine.resize(cols, rows);
        }
    }

    /// Dispose every engine
    pub fn destroy(&mut self) {
        self.pending_ai.clear();
        for tab in &mut self.tabs {
            tab.engine.destroy();
        }
    }

    fn save_preferences(&self) {
        let Some(store) = &self.store else {
            return;
        };
        TerminalPreferences {
            theme: self.options.theme.clone(),
            font_size: self.options.font_size,
        }
        .save(store.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wos_desktop::ManualClock;
    use wos_terminal::NoEmulator;

    fn app() -> AdvancedTerminalApp {
        AdvancedTerminalApp::new(
            TerminalOptions::default(),
            Rc::new(NoEmulator),
            Rc::new(AppRegistry::new()),
            Rc::new(ManualClock::new(0.0)),
            None,
        )
    }

    fn active_ids(app: &AdvancedTerminalApp) -> Vec<TabId> {
        app.tabs().iter().filter(|t| t.is_active()).map(Tab::id).collect()
    }

    #[test]
    fn test_starts_with_one_active_tab() {
        let app = app();
        assert_eq!(app.tabs().len(), 1);
        assert_eq!(app.active_tab().name(), "Terminal 1");
        assert_eq!(app.active_tab().display(), "block");
        let banner = app.active_tab().engine().screen().unwrap().visible_text();
        assert_eq!(banner[0], "Welcome to WebOS Terminal");
    }

    #[test]
    fn test_new_tab_becomes_active() {
        let mut app = app();
        let second = app.new_tab();
        assert_eq!(second, 2);
        assert_eq!(active_ids(&app), vec![2]);
        assert_eq!(app.tab(1).unwrap().display(), "none");
    }

    #[test]
    fn test_close_active_tab_activates_neighbor() {
        let mut app = app();
        app.new_tab();
        app.new_tab();
        app.switch_tab(2);
        assert!(app.close_tab(2));
        assert_eq!(active_ids(&app), vec![3]);

        assert!(app.close_tab(3));
        assert_eq!(active_ids(&app), vec![1]);
        assert!(!app.close_tab(3));
    }

    #[test]
    fn test_close_last_tab_clears_it() {
        let mut app = app();
        app.paste("echo hi\n");
        assert!(app.close_tab(1));
        assert_eq!(app.tabs().len(), 1);
        let tab = app.active_tab();
        assert!(tab.engine().screen().unwrap().visible_text().is_empty());
        assert_eq!(tab.engine().history(), vec!["echo hi"]);
    }

    #[test]
    fn test_close_last_tab_drops_typed_input() {
        let mut app = app();
        app.paste("rm -rf half-typed");
        assert!(app.close_tab(1));
        let engine = app.active_tab().engine();
        assert_eq!(engine.current_line(), "");
        assert_eq!(engine.screen().unwrap().input_line().text, "");
        assert_eq!(engine.history_index(), -1);
    }

    #[test]
    fn test_next_tab_wraps() {
        let mut app = app();
        app.new_tab();
        assert_eq!(app.next_tab(), 1);
        assert_eq!(app.next_tab(), 2);
    }

    #[test]
    fn test_rename_tab() {
        let mut app = app();
        assert!(app.rename_tab(1, "  build  "));
        assert_eq!(app.active_tab().name(), "build");
        assert!(!app.rename_tab(1, "   "));
        assert!(!app.rename_tab(9, "ghost"));
    }

    #[test]
    fn test_keys_run_commands_in_active_tab() {
        let mut app = app();
        app.new_tab();
        let outcomes = app.paste("cd /tmp\n");
        assert_eq!(outcomes, vec![CommandOutcome::Done]);
        assert_eq!(app.active_tab().engine().current_dir(), "/tmp");
        assert_eq!(app.tab(1).unwrap().engine().current_dir(), "/home/user");
    }

    #[test]
    fn test_completions_cover_commands() {
        let mut app = app();
        app.paste("hist");
        app.handle_key(Key::Tab);
        assert_eq!(app.active_tab().engine().current_line(), "history ");
    }
}
