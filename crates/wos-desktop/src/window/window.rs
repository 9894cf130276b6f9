//! Window record
//!
//! A [`Window`] is plain data owned by the manager. State changes go through
//! [`crate::WindowManager`]; this module only derives what the host paints,
//! the on-screen frame and the CSS classes.

use serde::{Deserialize, Serialize};

use crate::math::Rect;
use crate::scheduler::TimerId;
use crate::transition::{SnapAnimation, TransitionPhase};
use crate::types::{Generation, WindowId};
use crate::viewport::Viewport;

/// Logical window state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    /// Playing the close transition; evicted when it ends
    Closing,
}

/// An open window
#[derive(Clone, Debug)]
pub struct Window {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    pub content_html: String,
    /// Normal geometry. Kept as-is while maximized.
    pub rect: Rect,
    /// Geometry captured when the window was maximized
    pub restore_rect: Option<Rect>,
    pub state: WindowState,
    pub z_index: u32,
    /// Holds the single "active" slot
    pub active: bool,
    pub resizable: bool,
    pub generation: Generation,
    /// Set when activity tracking is attached
    pub opened_at_ms: Option<f64>,
    pub phase: TransitionPhase,
    pub snap: Option<SnapAnimation>,
    /// Minimized from the maximized state
    pub(crate) resume_maximized: bool,
    pub(crate) snap_timer: Option<TimerId>,
    pub(crate) open_seq: u64,
}

impl Window {
    /// Focused and visible
    pub fn is_active(&self) -> bool {
        self.active && self.state != WindowState::Minimized && self.state != WindowState::Closing
    }

    pub fn is_minimized(&self) -> bool {
        self.state == WindowState::Minimized
    }

    pub fn is_maximized(&self) -> bool {
        self.state == WindowState::Maximized
    }

    pub fn is_closing(&self) -> bool {
        self.state == WindowState::Closing
    }

    /// On-screen geometry at `now_ms`
    pub fn frame(&self, viewport: &Viewport, now_ms: f64) -> Rect {
        if self.is_maximized() {
            return viewport.maximize_bounds();
        }
        match &self.snap {
            Some(anim) => anim.current(now_ms),
            None => self.rect,
        }
    }

    /// CSS classes for the window element
    pub fn css_classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["window"];
        classes.push(if self.active { "active" } else { "inactive" });
        match self.state {
            WindowState::Minimized => classes.push("minimized"),
            WindowState::Maximized => classes.push("maximized"),
            WindowState::Normal | WindowState::Closing => {}
        }
        if let Some(kind) = self.phase.active() {
            classes.push(kind.css_class());
        }
        if self.snap.is_some() {
            classes.push("snapping");
        }
        classes
    }
}
