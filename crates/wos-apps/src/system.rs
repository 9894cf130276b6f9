//! Composition root
//!
//! [`System`] builds and wires one desktop: store, clock, window manager,
//! app registry and terminal app. Nothing is global; tests build as many
//! independent systems as they like.

use std::cell::RefCell;
use std::rc::Rc;

use wos_desktop::{ActivityLog, Clock, DesktopSettings, WindowConfig, WindowManager};
use wos_storage::SharedStore;
use wos_terminal::{EmulatorLibrary, TerminalOptions};

use crate::ai::AiCompletion;
use crate::error::AppResult;
use crate::registry::AppRegistry;
use crate::terminal::{AdvancedTerminalApp, CODE_EDITOR_APP, TERMINAL_APP};

/// A launchable app with its default window size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub width: f32,
    pub height: f32,
}

/// Apps every desktop starts with
pub const DEFAULT_APPS: &[AppSpec] = &[
    AppSpec {
        id: "notes",
        title: "Notes",
        width: 800.0,
        height: 600.0,
    },
    AppSpec {
        id: "tasks",
        title: "Tasks",
        width: 700.0,
        height: 600.0,
    },
    AppSpec {
        id: TERMINAL_APP,
        title: "Terminal",
        width: 900.0,
        height: 600.0,
    },
    AppSpec {
        id: "browser",
        title: "Browser",
        width: 1000.0,
        height: 700.0,
    },
    AppSpec {
        id: "music",
        title: "Music",
        width: 800.0,
        height: 600.0,
    },
    AppSpec {
        id: CODE_EDITOR_APP,
        title: "Code Editor",
        width: 1000.0,
        height: 700.0,
    },
];

fn icon_svg(id: &str) -> String {
    format!(
        r#"<svg viewBox="0 0 24 24" data-app="{}"><rect x="3" y="3" width="18" height="18" rx="4"/></svg>"#,
        id
    )
}

/// One wired desktop
pub struct System {
    windows: Rc<RefCell<WindowManager>>,
    apps: Rc<AppRegistry>,
    activity: Rc<ActivityLog>,
    terminal: AdvancedTerminalApp,
    clock: Rc<dyn Clock>,
}

impl System {
    /// Wire a desktop with the default apps
    ///
    /// `library` is probed once per terminal tab; pass
    /// [`wos_terminal::NoEmulator`] to always use the fallback renderer.
    pub fn new(
        settings: DesktopSettings,
        clock: Rc<dyn Clock>,
        store: Option<SharedStore>,
        library: Rc<dyn EmulatorLibrary>,
    ) -> Self {
        Self::with_apps(settings, clock, store, library, DEFAULT_APPS)
    }

    /// Wire a desktop with a custom app list
    pub fn with_apps(
        settings: DesktopSettings,
        clock: Rc<dyn Clock>,
        store: Option<SharedStore>,
        library: Rc<dyn EmulatorLibrary>,
        specs: &[AppSpec],
    ) -> Self {
        let activity = Rc::new(ActivityLog::new());
        let mut manager =
            WindowManager::new(settings, clock.clone()).with_activity(activity.clone());
        if let Some(store) = &store {
            manager = manager.with_store(store.clone());
        }
        let windows = Rc::new(RefCell::new(manager));

        let mut apps = AppRegistry::new();
        for spec in specs {
            let icon = icon_svg(spec.id);
            apps.register(
                spec.id,
                spec.title,
                icon.clone(),
                launcher(Rc::downgrade(&windows), *spec, icon),
            );
        }
        if apps.contains(TERMINAL_APP) {
            windows
                .borrow_mut()
                .pin_app(TERMINAL_APP, "Terminal", &icon_svg(TERMINAL_APP));
        }
        let apps = Rc::new(apps);

        let terminal = AdvancedTerminalApp::new(
            TerminalOptions::default(),
            library,
            apps.clone(),
            clock.clone(),
            store,
        );
        tracing::debug!(apps = apps.len(), "system wired");

        Self {
            windows,
            apps,
            activity,
            terminal,
            clock,
        }
    }

    /// Attach the AI assistant for the terminal's `ai` commands
    pub fn with_ai(mut self, ai: Rc<dyn AiCompletion>) -> Self {
        self.terminal = self.terminal.with_ai(ai);
        self
    }

    pub fn windows(&self) -> &Rc<RefCell<WindowManager>> {
        &self.windows
    }

    pub fn apps(&self) -> &AppRegistry {
        &self.apps
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn terminal(&self) -> &AdvancedTerminalApp {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut AdvancedTerminalApp {
        &mut self.terminal
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    /// Open an app window by id
    pub fn open_app(&self, id: &str) -> AppResult<()> {
        self.apps.open(id).map(|_| ())
    }

    /// Run due window timers and print AI answers that have arrived
    ///
    /// Returns the number of timers run plus answers delivered.
    pub fn tick(&mut self) -> usize {
        let timers = match self.windows.try_borrow_mut() {
            Ok(mut windows) => windows.tick(),
            Err(_) => {
                tracing::warn!("window manager busy, tick skipped");
                0
            }
        };
        timers + self.terminal.poll_ai()
    }

    /// Tear down the terminal and flush pending window saves
    pub fn shutdown(&mut self) {
        self.terminal.destroy();
        if let Ok(mut windows) = self.windows.try_borrow_mut() {
            windows.flush_positions();
        }
    }
}

/// Launcher opening `spec` as a window
///
/// Holds the manager weakly so the registry does not keep it alive.
fn launcher(
    windows: std::rc::Weak<RefCell<WindowManager>>,
    spec: AppSpec,
    icon: String,
) -> impl Fn() + 'static {
    move || {
        let Some(windows) = windows.upgrade() else {
            tracing::warn!(app = spec.id, "window manager gone, launch ignored");
            return;
        };
        let Ok(mut windows) = windows.try_borrow_mut() else {
            tracing::warn!(app = spec.id, "window manager busy, launch ignored");
            return;
        };
        let config = WindowConfig::new(spec.title)
            .with_icon(icon.clone())
            .with_size(spec.width, spec.height);
        windows.create_window(spec.id, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wos_desktop::ManualClock;
    use wos_terminal::NoEmulator;

    fn system() -> System {
        System::new(
            DesktopSettings::default(),
            Rc::new(ManualClock::new(0.0)),
            None,
            Rc::new(NoEmulator),
        )
    }

    #[test]
    fn test_default_apps_registered() {
        let system = system();
        let ids: Vec<&str> = system.apps().ids().collect();
        assert_eq!(
            ids,
            vec!["browser", "code-editor", "music", "notes", "tasks", "terminal"]
        );
    }

    #[test]
    fn test_open_app_opens_window() {
        let system = system();
        system.open_app("notes").unwrap();
        system.open_app("notes").unwrap();
        let windows = system.windows().borrow();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows.get("notes").unwrap().title, "Notes");
    }

    #[test]
    fn test_terminal_is_pinned() {
        let system = system();
        let windows = system.windows().borrow();
        assert_eq!(windows.taskbar().pinned()[0].id, "terminal");
    }
}
