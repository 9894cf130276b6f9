//! App registry
//!
//! Maps app id to display metadata and a launcher. The terminal's `open`
//! command and the desktop icons read from it; nothing outside setup
//! mutates it.

use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

type Launcher = Box<dyn Fn()>;

/// One launchable app
pub struct AppEntry {
    pub id: String,
    pub title: String,
    pub icon_svg: String,
    launcher: Launcher,
}

impl AppEntry {
    /// Launch the app
    pub fn open(&self) {
        (self.launcher)();
    }
}

impl std::fmt::Debug for AppEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppEntry")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Registered apps, ordered by id
#[derive(Debug, Default)]
pub struct AppRegistry {
    apps: BTreeMap<String, AppEntry>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an app, replacing any previous entry with the same id
    pub fn register(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        icon_svg: impl Into<String>,
        launcher: impl Fn() + 'static,
    ) {
        let id = id.into();
        let entry = AppEntry {
            id: id.clone(),
            title: title.into(),
            icon_svg: icon_svg.into(),
            launcher: Box::new(launcher),
        };
        if self.apps.insert(id.clone(), entry).is_some() {
            tracing::debug!(app = %id, "app re-registered");
        } else {
            tracing::debug!(app = %id, "app registered");
        }
    }

    pub fn get(&self, id: &str) -> Option<&AppEntry> {
        self.apps.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.apps.contains_key(id)
    }

    /// Launch an app by id
    pub fn open(&self, id: &str) -> AppResult<&AppEntry> {
        let entry = self
            .apps
            .get(id)
            .ok_or_else(|| AppError::UnknownApp(id.to_string()))?;
        tracing::debug!(app = id, "launching app");
        entry.open();
        Ok(entry)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &AppEntry> {
        self.apps.values()
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}
