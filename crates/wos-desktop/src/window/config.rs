use serde::{Deserialize, Serialize};

use crate::math::{Size, Vec2};

/// Configuration for opening a window
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Titlebar text
    pub title: String,
    /// Icon markup (SVG) shown in the titlebar and taskbar
    pub icon: String,
    /// Initial body markup, owned by the app afterwards
    pub content_html: String,
    /// Requested size (clamped to the viewport)
    pub size: Size,
    /// Explicit position; default placement is used when `None`
    pub position: Option<Vec2>,
    /// Whether resize handles are attached
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            icon: String::new(),
            content_html: String::new(),
            size: Size::new(800.0, 600.0),
            position: None,
            resizable: true,
        }
    }
}

impl WindowConfig {
    /// Config with a title and default size
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the requested size
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Set an explicit position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Vec2::new(x, y));
        self
    }

    /// Set the icon markup
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    /// Set the body markup
    pub fn with_content(mut self, html: impl Into<String>) -> Self {
        self.content_html = html.into();
        self
    }

    /// Disable resize handles
    pub fn fixed_size(mut self) -> Self {
        self.resizable = false;
        self
    }
}
