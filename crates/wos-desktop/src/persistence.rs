//! Window position persistence
//!
//! Positions live under a single `windows` key of the store, as an object
//! keyed by window id:
//!
//! ```json
//! { "notes": { "left": 120, "top": 80, "width": 800, "height": 600, "maximized": false } }
//! ```
//!
//! All of this is best effort. Without a store every read misses and every
//! write is dropped; a corrupt `windows` value reads as empty.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wos_storage::SharedStore;

use crate::error::{DesktopError, DesktopResult};
use crate::math::Rect;

/// Storage key holding every window's position record
pub const WINDOWS_KEY: &str = "windows";

/// Persisted geometry of one window
///
/// `left/top/width/height` are always the normal (restored) geometry;
/// a maximized window is recorded with its pre-maximize rectangle and
/// `maximized: true`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WindowPosition {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub maximized: bool,
}

impl WindowPosition {
    /// Build a record from a rectangle
    pub fn from_rect(rect: Rect, maximized: bool) -> Self {
        Self {
            left: rect.x,
            top: rect.y,
            width: rect.width,
            height: rect.height,
            maximized,
        }
    }

    /// Geometry as a rectangle
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    fn is_finite(&self) -> bool {
        [self.left, self.top, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// Reader/writer for the `windows` record map
#[derive(Clone, Default)]
pub struct PositionStore {
    store: Option<SharedStore>,
}

impl PositionStore {
    /// Create a position store over an optional backing store
    pub fn new(store: Option<SharedStore>) -> Self {
        Self { store }
    }

    /// Check whether a backing store is attached
    pub fn is_attached(&self) -> bool {
        self.store.is_some()
    }

    /// Decode the whole record map
    pub fn try_load_all(&self) -> DesktopResult<BTreeMap<String, WindowPosition>> {
        let Some(store) = &self.store else {
            return Ok(BTreeMap::new());
        };
        match store.get(WINDOWS_KEY) {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| DesktopError::PersistenceError(e.to_string())),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Record map, or empty if missing or corrupt
    pub fn load_all(&self) -> BTreeMap<String, WindowPosition> {
        self.try_load_all().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable window positions");
            BTreeMap::new()
        })
    }

    /// Saved position for one window
    pub fn load(&self, id: &str) -> Option<WindowPosition> {
        self.load_all().remove(id).filter(|p| {
            let ok = p.is_finite();
            if !ok {
                tracing::warn!(window = id, "ignoring non-finite saved position");
            }
            ok
        })
    }

    /// Merge `updates` into the stored map with a single write
    pub fn save_many(&self, updates: impl IntoIterator<Item = (String, WindowPosition)>) {
        let Some(store) = &self.store else {
            return;
        };
        let mut all = self.load_all();
        let mut changed = 0usize;
        for (id, pos) in updates {
            all.insert(id, pos);
            changed += 1;
        }
        if changed == 0 {
            return;
        }
        match serde_json::to_value(&all) {
            Ok(value) => {
                tracing::trace!(count = changed, "persisting window positions");
                store.set(WINDOWS_KEY, value);
            }
            Err(e) => tracing::warn!(error = %e, "failed to encode window positions"),
        }
    }

    /// Save a single window's position
    pub fn save(&self, id: &str, pos: WindowPosition) {
        self.save_many([(id.to_string(), pos)]);
    }
}
