use super::Window;

type WindowCallback = Box<dyn FnMut(&Window)>;
type MaximizeCallback = Box<dyn FnMut(&Window, bool)>;

/// Lifecycle callbacks supplied by the app that owns a window
#[derive(Default)]
pub struct WindowHooks {
    pub on_open: Option<WindowCallback>,
    pub on_focus: Option<WindowCallback>,
    /// Receives `true` when the window became maximized
    pub on_maximize: Option<MaximizeCallback>,
    pub on_close: Option<WindowCallback>,
}

impl WindowHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_open(mut self, f: impl FnMut(&Window) + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_focus(mut self, f: impl FnMut(&Window) + 'static) -> Self {
        self.on_focus = Some(Box::new(f));
        self
    }

    pub fn on_maximize(mut self, f: impl FnMut(&Window, bool) + 'static) -> Self {
        self.on_maximize = Some(Box::new(f));
        self
    }

    pub fn on_close(mut self, f: impl FnMut(&Window) + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for WindowHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowHooks")
            .field("on_open", &self.on_open.is_some())
            .field("on_focus", &self.on_focus.is_some())
            .field("on_maximize", &self.on_maximize.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}
