//! Browser viewport and the placement rules derived from it
//!
//! The usable area is the viewport minus the taskbar strip at the bottom.
//! All clamping is done per axis; aspect ratio is never preserved.

use serde::{Deserialize, Serialize};

use crate::math::{Rect, Size, Vec2};

/// Visible browser area
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Viewport size in pixels
    pub size: Size,
    /// Taskbar height in pixels (reserved at the bottom)
    pub taskbar_height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920.0, 1080.0, 56.0)
    }
}

impl Viewport {
    /// Create a new viewport
    pub fn new(width: f32, height: f32, taskbar_height: f32) -> Self {
        Self {
            size: Size::new(width.max(0.0), height.max(0.0)),
            taskbar_height: taskbar_height.max(0.0),
        }
    }

    /// Height available to windows
    pub fn usable_height(&self) -> f32 {
        (self.size.height - self.taskbar_height).max(0.0)
    }

    /// Area available to windows
    pub fn usable_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width, self.usable_height())
    }

    /// Geometry of a maximized window
    pub fn maximize_bounds(&self) -> Rect {
        self.usable_rect()
    }

    /// Largest size a normal window may have, keeping `margin` free
    pub fn max_window_size(&self, margin: f32) -> Size {
        Size::new(
            (self.size.width - margin).max(0.0),
            (self.usable_height() - margin).max(0.0),
        )
    }

    /// Clamp a requested size to the viewport
    pub fn fit_size(&self, requested: Size, margin: f32) -> Size {
        requested.max(Size::new(0.0, 0.0)).min(self.max_window_size(margin))
    }

    /// Default placement: centered horizontally, a third of the way down,
    /// never closer than `min_margin` to the top-left.
    pub fn default_position(&self, size: Size, min_margin: f32) -> Vec2 {
        let x = ((self.size.width - size.width) / 2.0).max(min_margin);
        let y = ((self.usable_height() - size.height) / 3.0).max(min_margin);
        Vec2::new(x, y)
    }

    /// Keep a window fully on screen
    ///
    /// Size is clamped to `viewport - margin` first, then the position is
    /// clamped so the whole window lies inside the usable area.
    pub fn contain(&self, rect: Rect, margin: f32) -> Rect {
        let size = self.fit_size(rect.size(), margin);
        let max_x = (self.size.width - size.width).max(0.0);
        let max_y = (self.usable_height() - size.height).max(0.0);
        Rect::new(
            rect.x.clamp(0.0, max_x),
            rect.y.clamp(0.0, max_y),
            size.width,
            size.height,
        )
    }

    /// Snap edges lying within `threshold` of a viewport edge flush to it
    ///
    /// Returns `None` when no edge is close enough.
    pub fn snap(&self, rect: Rect, threshold: f32) -> Option<Rect> {
        let mut snapped = rect;
        let usable = self.usable_rect();

        if rect.x.abs() <= threshold {
            snapped.x = 0.0;
        } else if (usable.right() - rect.right()).abs() <= threshold {
            snapped.x = usable.right() - rect.width;
        }

        if rect.y.abs() <= threshold {
            snapped.y = 0.0;
        } else if (usable.bottom() - rect.bottom()).abs() <= threshold {
            snapped.y = usable.bottom() - rect.height;
        }

        (snapped != rect).then_some(snapped)
    }
}
