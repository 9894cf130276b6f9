use std::collections::HashMap;

use crate::math::{Rect, Size, Vec2};
use crate::types::WindowId;

use super::{DragManager, DragTarget, ResizeHandle};

/// Smallest size a resize can shrink a window to
pub const MIN_WINDOW_SIZE: Size = Size::new(200.0, 150.0);

#[derive(Debug, Default)]
struct Registration {
    draggable: bool,
    handles: Vec<ResizeHandle>,
}

#[derive(Debug)]
struct ActiveDrag {
    window: WindowId,
    target: DragTarget,
    start_pointer: Vec2,
    start_rect: Rect,
}

/// Default [`DragManager`]: move by titlebar, resize from eight handles
#[derive(Debug)]
pub struct PointerDrag {
    registered: HashMap<WindowId, Registration>,
    active: Option<ActiveDrag>,
    min_size: Size,
}

impl Default for PointerDrag {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerDrag {
    pub fn new() -> Self {
        Self::with_min_size(MIN_WINDOW_SIZE)
    }

    /// Create with a custom minimum window size
    pub fn with_min_size(min_size: Size) -> Self {
        Self {
            registered: HashMap::new(),
            active: None,
            min_size,
        }
    }

    /// Number of windows registered
    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    fn geometry(&self, drag: &ActiveDrag, pointer: Vec2) -> Rect {
        let delta = pointer - drag.start_pointer;
        let start = drag.start_rect;
        match drag.target {
            DragTarget::TitleBar => Rect::from_pos_size(start.position() + delta, start.size()),
            DragTarget::Resize(handle) => {
                let mut rect = start;
                if handle.moves_right() {
                    rect.width = (start.width + delta.x).max(self.min_size.width);
                }
                if handle.moves_left() {
                    rect.width = (start.width - delta.x).max(self.min_size.width);
                    rect.x = start.right() - rect.width;
                }
                if handle.moves_bottom() {
                    rect.height = (start.height + delta.y).max(self.min_size.height);
                }
                if handle.moves_top() {
                    rect.height = (start.height - delta.y).max(self.min_size.height);
                    rect.y = start.bottom() - rect.height;
                }
                rect
            }
        }
    }
}

impl DragManager for PointerDrag {
    fn init_drag(&mut self, window: &str) {
        self.registered.entry(window.to_string()).or_default().draggable = true;
    }

    fn init_resize(&mut self, window: &str, handles: &[ResizeHandle]) {
        self.registered
            .entry(window.to_string())
            .or_default()
            .handles = handles.to_vec();
    }

    fn release(&mut self, window: &str) {
        self.registered.remove(window);
        if self.active.as_ref().is_some_and(|d| d.window == window) {
            self.active = None;
        }
    }

    fn begin(&mut self, window: &str, target: DragTarget, pointer: Vec2, rect: Rect) -> bool {
        let Some(reg) = self.registered.get(window) else {
            return false;
        };
        let allowed = match target {
            DragTarget::TitleBar => reg.draggable,
            DragTarget::Resize(handle) => reg.handles.contains(&handle),
        };
        if !allowed {
            return false;
        }
        self.active = Some(ActiveDrag {
            window: window.to_string(),
            target,
            start_pointer: pointer,
            start_rect: rect,
        });
        true
    }

    fn update(&mut self, pointer: Vec2) -> Option<(WindowId, Rect)> {
        let drag = self.active.as_ref()?;
        Some((drag.window.clone(), self.geometry(drag, pointer)))
    }

    fn finish(&mut self, pointer: Vec2) -> Option<(WindowId, Rect)> {
        let drag = self.active.take()?;
        let rect = self.geometry(&drag, pointer);
        Some((drag.window, rect))
    }

    fn cancel(&mut self) {
        self.active = None;
    }

    fn dragging(&self) -> Option<&str> {
        self.active.as_ref().map(|d| d.window.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered() -> PointerDrag {
        let mut drag = PointerDrag::new();
        drag.init_drag("notes");
        drag.init_resize("notes", &ResizeHandle::ALL);
        drag
    }

    #[test]
    fn test_move() {
        let mut drag = registered();
        let start = Rect::new(100.0, 100.0, 400.0, 300.0);
        assert!(drag.begin("notes", DragTarget::TitleBar, Vec2::new(150.0, 110.0), start));

        let (id, rect) = drag.update(Vec2::new(200.0, 160.0)).unwrap();
        assert_eq!(id, "notes");
        assert_eq!(rect, Rect::new(150.0, 150.0, 400.0, 300.0));

        let (_, rect) = drag.finish(Vec2::new(170.0, 100.0)).unwrap();
        assert_eq!(rect, Rect::new(120.0, 90.0, 400.0, 300.0));
        assert!(drag.dragging().is_none());
    }

    #[test]
    fn test_resize_from_top_left_respects_min_size() {
        let mut drag = registered();
        let start = Rect::new(100.0, 100.0, 400.0, 300.0);
        drag.begin(
            "notes",
            DragTarget::Resize(ResizeHandle::NW),
            Vec2::new(100.0, 100.0),
            start,
        );

        let (_, rect) = drag.finish(Vec2::new(450.0, 400.0)).unwrap();
        assert_eq!(rect.width, MIN_WINDOW_SIZE.width);
        assert_eq!(rect.height, MIN_WINDOW_SIZE.height);
        // Opposite corner stays put
        assert_eq!(rect.right(), start.right());
        assert_eq!(rect.bottom(), start.bottom());
    }

    #[test]
    fn test_unregistered_window_cannot_drag() {
        let mut drag = PointerDrag::new();
        assert!(!drag.begin("ghost", DragTarget::TitleBar, Vec2::ZERO, Rect::default()));
        assert!(drag.update(Vec2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_release_cancels_active_drag() {
        let mut drag = registered();
        drag.begin("notes", DragTarget::TitleBar, Vec2::ZERO, Rect::default());
        drag.release("notes");
        assert!(drag.dragging().is_none());
        assert_eq!(drag.registered_count(), 0);
    }
}
