use serde::Serialize;

use crate::math::Rect;

/// Animated move of a released window onto a viewport edge
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SnapAnimation {
    /// Geometry at release
    pub from: Rect,
    /// Snapped geometry
    pub to: Rect,
    /// Start time (ms)
    pub start_ms: f64,
    /// Duration (ms)
    pub duration_ms: f64,
}

impl SnapAnimation {
    /// Create a new snap animation
    pub fn new(from: Rect, to: Rect, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// Get progress (0.0 to 1.0)
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (((now_ms - self.start_ms) / self.duration_ms) as f32).clamp(0.0, 1.0)
    }

    /// Check if the animation has finished
    pub fn is_complete(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }

    /// Interpolated geometry at `now_ms`
    pub fn current(&self, now_ms: f64) -> Rect {
        self.from.lerp(&self.to, ease_out_cubic(self.progress(now_ms)))
    }
}

/// Ease-out cubic, the curve the stylesheet uses for snapping
#[inline]
fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
