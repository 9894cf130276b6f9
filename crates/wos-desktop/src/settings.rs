//! Tunables for window placement, animation and persistence timing.

use serde::{Deserialize, Serialize};

/// Desktop layout and timing settings
///
/// Defaults match the stylesheet the browser host ships with (taskbar
/// height, CSS transition lengths).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopSettings {
    /// Space kept free around a window when clamping its size (px)
    pub viewport_margin: f32,
    /// Minimum distance from the viewport edge for default placement (px)
    pub placement_margin: f32,
    /// Height of the taskbar at the bottom of the viewport (px)
    pub taskbar_height: f32,
    /// Distance from a viewport edge within which a released window snaps (px)
    pub snap_threshold: f32,
    /// Delay between drag release and snap evaluation (ms)
    pub snap_delay_ms: f64,
    /// Length of the snap animation (ms)
    pub snap_duration_ms: f64,
    /// Length of the minimize/maximize/close CSS transitions (ms)
    pub transition_ms: f64,
    /// Trailing debounce for position writes (ms)
    pub save_debounce_ms: f64,
    /// Trailing debounce for viewport resize handling (ms)
    pub resize_debounce_ms: f64,
    /// First z-index handed out
    pub base_z_index: u32,
}

impl Default for DesktopSettings {
    fn default() -> Self {
        Self {
            viewport_margin: 40.0,
            placement_margin: 20.0,
            taskbar_height: 56.0,
            snap_threshold: 20.0,
            snap_delay_ms: 100.0,
            snap_duration_ms: 200.0,
            transition_ms: 300.0,
            save_debounce_ms: 300.0,
            resize_debounce_ms: 150.0,
            base_z_index: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: DesktopSettings =
            serde_json::from_str(r#"{"taskbar_height": 48.0}"#).unwrap();
        assert_eq!(settings.taskbar_height, 48.0);
        assert_eq!(settings.viewport_margin, 40.0);
        assert_eq!(settings.base_z_index, 1000);
    }
}
