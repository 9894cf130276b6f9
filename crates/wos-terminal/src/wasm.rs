//! Browser bindings
//!
//! [`XtermLibrary`] probes `globalThis.Terminal` (xterm.js) and its UMD
//! addons. When the script is absent the engine falls back to the
//! built-in renderer, whose screen the page draws from `screen_json`.

use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wos_storage::{LocalStore, SharedStore};

use crate::backend::{Addon, EmulatorLibrary, EmulatorSession};
use crate::engine::TerminalEngine;
use crate::error::{TerminalError, TerminalResult};
use crate::options::TerminalOptions;
use crate::theme::Palette;

fn describe(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn get(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    Reflect::get(target, &JsValue::from_str(name))
}

fn set(target: &JsValue, name: &str, value: impl Into<JsValue>) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(name), &value.into()).map(|_| ())
}

fn call(target: &JsValue, method: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let f: Function = get(target, method)?.dyn_into()?;
    f.apply(target, &args.iter().collect::<Array>())
}

fn theme_object(palette: &Palette) -> Result<Object, JsValue> {
    const NAMES: [&str; 8] = [
        "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
    ];
    let theme = Object::new();
    set(&theme, "background", palette.background)?;
    set(&theme, "foreground", palette.foreground)?;
    set(&theme, "cursor", palette.cursor)?;
    set(&theme, "selectionBackground", palette.selection)?;
    for (name, color) in NAMES.iter().zip(palette.ansi) {
        set(&theme, name, color)?;
    }
    Ok(theme)
}

/// xterm.js, if the page loaded it
pub struct XtermLibrary {
    container_id: String,
}

impl XtermLibrary {
    pub fn new(container_id: impl Into<String>) -> Self {
        Self {
            container_id: container_id.into(),
        }
    }

    fn open_session(&self, options: &TerminalOptions) -> Result<XtermSession, JsValue> {
        let global: JsValue = js_sys::global().into();
        let ctor: Function = get(&global, "Terminal")?.dyn_into()?;

        let opts = Object::new();
        set(&opts, "fontSize", options.font_size)?;
        set(&opts, "fontFamily", options.font_family.as_str())?;
        set(&opts, "cursorBlink", options.cursor_blink)?;
        set(&opts, "scrollback", options.scrollback as u32)?;
        set(&opts, "cols", options.cols)?;
        set(&opts, "rows", options.rows)?;

        let term = Reflect::construct(&ctor, &Array::of1(&opts))?;
        let container = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(&self.container_id))
            .ok_or_else(|| JsValue::from_str("terminal container not found"))?;
        call(&term, "open", &[container.into()])?;

        Ok(XtermSession { term, fit: None })
    }
}

impl EmulatorLibrary for XtermLibrary {
    fn open(&self, options: &TerminalOptions) -> TerminalResult<Box<dyn EmulatorSession>> {
        let global: JsValue = js_sys::global().into();
        let present = get(&global, "Terminal").map(|t| t.is_function()).unwrap_or(false);
        if !present {
            return Err(TerminalError::EmulatorUnavailable(
                "xterm.js is not loaded".to_string(),
            ));
        }
        self.open_session(options)
            .map(|s| Box::new(s) as Box<dyn EmulatorSession>)
            .map_err(|e| TerminalError::EmulatorFailed(describe(e)))
    }
}

struct XtermSession {
    term: JsValue,
    fit: Option<JsValue>,
}

impl XtermSession {
    fn run(&self, method: &str, args: &[JsValue]) {
        if let Err(e) = call(&self.term, method, args) {
            tracing::warn!(method, error = %describe(e), "xterm call failed");
        }
    }

    fn set_option(&self, name: &str, value: JsValue) {
        let result = get(&self.term, "options").and_then(|opts| set(&opts, name, value));
        if let Err(e) = result {
            tracing::warn!(option = name, error = %describe(e), "xterm option not applied");
        }
    }
}

impl EmulatorSession for XtermSession {
    fn write(&mut self, data: &str) {
        self.run("write", &[JsValue::from_str(data)]);
    }

    fn clear(&mut self) {
        self.run("clear", &[]);
    }

    fn focus(&mut self) {
        self.run("focus", &[]);
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        match &self.fit {
            Some(fit) => {
                if let Err(e) = call(fit, "fit", &[]) {
                    tracing::warn!(error = %describe(e), "fit addon failed");
                }
            }
            None => self.run("resize", &[cols.into(), rows.into()]),
        }
    }

    fn set_theme(&mut self, palette: &Palette) {
        match theme_object(palette) {
            Ok(theme) => self.set_option("theme", theme.into()),
            Err(e) => tracing::warn!(error = %describe(e), "theme object not built"),
        }
    }

    fn set_font_size(&mut self, px: u16) {
        self.set_option("fontSize", px.into());
    }

    fn load_addon(&mut self, addon: Addon) -> TerminalResult<()> {
        let (namespace, class) = match addon {
            Addon::Fit => ("FitAddon", "FitAddon"),
            Addon::WebLinks => ("WebLinksAddon", "WebLinksAddon"),
        };
        let loaded = (|| -> Result<JsValue, JsValue> {
            let global: JsValue = js_sys::global().into();
            let ctor: Function = get(&get(&global, namespace)?, class)?.dyn_into()?;
            let instance = Reflect::construct(&ctor, &Array::new())?;
            call(&self.term, "loadAddon", &[instance.clone()])?;
            Ok(instance)
        })();

        match loaded {
            Ok(instance) => {
                if addon == Addon::Fit {
                    self.fit = Some(instance);
                }
                Ok(())
            }
            Err(e) => Err(TerminalError::AddonFailed {
                addon: addon.name(),
                reason: describe(e),
            }),
        }
    }

    fn dispose(&mut self) {
        self.run("dispose", &[]);
        self.fit = None;
    }
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Terminal engine exported to JavaScript
#[wasm_bindgen]
pub struct TerminalController {
    engine: TerminalEngine,
}

#[wasm_bindgen]
impl TerminalController {
    /// Create a terminal in the element with id `container_id`;
    /// `options_json` is a serialized `TerminalOptions` or empty
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str, options_json: &str) -> Result<TerminalController, JsValue> {
        let options = if options_json.trim().is_empty() {
            TerminalOptions::default()
        } else {
            serde_json::from_str(options_json).map_err(js_error)?
        };
        let store: SharedStore = Rc::new(LocalStore::new("wos"));
        let engine = TerminalEngine::new(options, &XtermLibrary::new(container_id)).with_store(store);
        Ok(TerminalController { engine })
    }

    /// "primary" or "fallback"
    pub fn backend(&self) -> String {
        serde_json::to_value(self.engine.kind())
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// DOM keydown; returns the submitted line, if any
    pub fn key_down(&mut self, key: &str, ctrl: bool) -> Option<String> {
        self.engine.handle_dom_key(key, ctrl)
    }

    /// xterm `onData`; returns submitted lines as a JSON array
    pub fn input_data(&mut self, data: &str) -> String {
        let lines = self.engine.handle_data(data);
        serde_json::to_string(&lines).unwrap_or_else(|_| "[]".to_string())
    }

    /// Paste; returns submitted lines as a JSON array
    pub fn paste(&mut self, text: &str) -> String {
        let lines = self.engine.paste(text);
        serde_json::to_string(&lines).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn write(&mut self, text: &str) {
        self.engine.write(text);
    }

    pub fn writeln(&mut self, text: &str) {
        self.engine.writeln(text);
    }

    pub fn clear(&mut self) {
        self.engine.clear();
    }

    pub fn focus(&mut self) {
        self.engine.focus();
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.engine.resize(cols, rows);
    }

    pub fn show_prompt(&mut self) {
        self.engine.show_prompt();
    }

    /// Apply a theme; returns the name actually applied
    pub fn set_theme(&mut self, name: &str) -> String {
        self.engine.apply_theme(name).name.to_string()
    }

    /// Fallback screen as JSON, or `null` on the emulator backend
    pub fn screen_json(&self) -> String {
        match self.engine.screen() {
            Some(screen) => {
                serde_json::to_string(&screen.snapshot()).unwrap_or_else(|_| "null".to_string())
            }
            None => "null".to_string(),
        }
    }

    pub fn destroy(&mut self) {
        self.engine.destroy();
    }
}
