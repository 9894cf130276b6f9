//! Browser bindings
//!
//! The page owns the DOM; it forwards pointer and button events here and
//! re-renders window frames and the taskbar from the JSON snapshots.

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wos_storage::{LocalStore, SharedStore};

use crate::clock::SystemClock;
use crate::input::{DragTarget, ResizeHandle};
use crate::settings::DesktopSettings;
use crate::window::{WindowConfig, WindowManager};

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Window manager exported to JavaScript
#[wasm_bindgen]
pub struct DesktopController {
    wm: WindowManager,
}

#[wasm_bindgen]
impl DesktopController {
    /// Create a controller for a viewport of the given size
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> DesktopController {
        let store: SharedStore = Rc::new(LocalStore::new("wos"));
        let wm = WindowManager::new(DesktopSettings::default(), Rc::new(SystemClock))
            .with_store(store)
            .with_viewport(width, height);
        DesktopController { wm }
    }

    /// Open a window; `config_json` is a serialized `WindowConfig`
    pub fn create_window(&mut self, id: &str, config_json: &str) -> Result<u32, JsValue> {
        let config: WindowConfig = serde_json::from_str(config_json).map_err(js_error)?;
        Ok(self.wm.create_window(id, config).generation as u32)
    }

    pub fn focus_window(&mut self, id: &str) -> bool {
        self.wm.focus_window(id)
    }

    pub fn minimize_window(&mut self, id: &str) -> bool {
        self.wm.minimize_window(id)
    }

    pub fn maximize_window(&mut self, id: &str) -> bool {
        self.wm.maximize_window(id)
    }

    pub fn restore_window(&mut self, id: &str) -> bool {
        self.wm.restore_window(id)
    }

    pub fn close_window(&mut self, id: &str) -> bool {
        self.wm.close_window(id)
    }

    pub fn taskbar_click(&mut self, id: &str) -> bool {
        self.wm.toggle_from_taskbar(id)
    }

    pub fn pin_app(&mut self, id: &str, title: &str, icon: &str) {
        self.wm.pin_app(id, title, icon);
    }

    /// Titlebar pointerdown
    pub fn begin_move(&mut self, id: &str, x: f32, y: f32) -> bool {
        self.wm.begin_drag(id, DragTarget::TitleBar, x, y)
    }

    /// Resize handle pointerdown; `handle` is one of n/s/e/w/ne/nw/se/sw
    pub fn begin_resize(&mut self, id: &str, handle: &str, x: f32, y: f32) -> Result<bool, JsValue> {
        let handle: ResizeHandle = handle.parse().map_err(js_error)?;
        Ok(self.wm.begin_drag(id, DragTarget::Resize(handle), x, y))
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        self.wm.drag_to(x, y)
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.wm.end_drag(x, y)
    }

    /// `window` resize event
    pub fn resize_viewport(&mut self, width: f32, height: f32) {
        self.wm.set_viewport_size(width, height);
    }

    /// Run due deferred work; call from `requestAnimationFrame`
    pub fn tick(&mut self) -> u32 {
        self.wm.tick() as u32
    }

    /// Window frames, classes and z-indices as JSON
    pub fn views_json(&self) -> String {
        serde_json::to_string(&self.wm.views()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Taskbar entries as JSON
    pub fn taskbar_json(&self) -> String {
        serde_json::to_string(self.wm.taskbar().items()).unwrap_or_else(|_| "[]".to_string())
    }
}
