//! Taskbar model
//!
//! The taskbar is rebuilt from scratch after every state change rather
//! than patched, so it can never drift from the window table. Pinned app
//! icons come first (flagged `running`/`active` by id lookup), followed by
//! open windows that are not pinned, in the order they were opened.

use serde::Serialize;

use crate::window::{Window, WindowState};

/// A pinned app icon
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PinnedApp {
    pub id: String,
    pub title: String,
    pub icon: String,
}

/// One taskbar entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskbarItem {
    /// Window / app id
    pub id: String,
    pub title: String,
    pub icon: String,
    /// Static pinned icon
    pub pinned: bool,
    /// A window with this id is open
    pub running: bool,
    /// That window is the focused, visible one
    pub active: bool,
    /// That window is minimized
    pub minimized: bool,
}

/// Taskbar contents
#[derive(Clone, Debug, Default, Serialize)]
pub struct Taskbar {
    pinned: Vec<PinnedApp>,
    items: Vec<TaskbarItem>,
    /// Incremented on every rebuild (lets a host skip redundant renders)
    revision: u64,
}

impl Taskbar {
    /// Create an empty taskbar
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pinned icon (ignored if already pinned)
    pub fn pin(&mut self, id: &str, title: &str, icon: &str) {
        if self.pinned.iter().any(|p| p.id == id) {
            return;
        }
        self.pinned.push(PinnedApp {
            id: id.to_string(),
            title: title.to_string(),
            icon: icon.to_string(),
        });
    }

    /// Remove a pinned icon
    pub fn unpin(&mut self, id: &str) -> bool {
        let before = self.pinned.len();
        self.pinned.retain(|p| p.id != id);
        self.pinned.len() != before
    }

    /// Rebuild entries from the open windows (already in open order)
    pub fn rebuild<'a>(&mut self, windows: impl IntoIterator<Item = &'a Window>) {
        let open: Vec<&Window> = windows
            .into_iter()
            .filter(|w| w.state != WindowState::Closing)
            .collect();

        let mut items = Vec::with_capacity(self.pinned.len() + open.len());
        for pin in &self.pinned {
            let window = open.iter().find(|w| w.id == pin.id);
            items.push(TaskbarItem {
                id: pin.id.clone(),
                title: pin.title.clone(),
                icon: pin.icon.clone(),
                pinned: true,
                running: window.is_some(),
                active: window.map(|w| w.is_active()).unwrap_or(false),
                minimized: window.map(|w| w.is_minimized()).unwrap_or(false),
            });
        }
        for window in open {
            if self.pinned.iter().any(|p| p.id == window.id) {
                continue;
            }
            items.push(TaskbarItem {
                id: window.id.clone(),
                title: window.title.clone(),
                icon: window.icon.clone(),
                pinned: false,
                running: true,
                active: window.is_active(),
                minimized: window.is_minimized(),
            });
        }

        self.items = items;
        self.revision += 1;
    }

    /// Current entries
    pub fn items(&self) -> &[TaskbarItem] {
        &self.items
    }

    /// Entry for an id
    pub fn item(&self, id: &str) -> Option<&TaskbarItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Pinned icons
    pub fn pinned(&self) -> &[PinnedApp] {
        &self.pinned
    }

    /// Rebuild counter
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
