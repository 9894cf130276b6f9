use crate::math::{Rect, Vec2};
use crate::types::WindowId;

use super::ResizeHandle;

/// What part of the window the pointer went down on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragTarget {
    /// Titlebar (move)
    TitleBar,
    /// Frame handle (resize)
    Resize(ResizeHandle),
}

/// Pointer-tracking collaborator
///
/// The manager registers each window's titlebar and resize handles when
/// the window opens and releases them when it is evicted. Between
/// `begin` and `finish` the drag manager owns the geometry; it reports
/// intermediate rectangles from `update` and the final one from `finish`.
pub trait DragManager {
    /// Make a window's titlebar draggable
    fn init_drag(&mut self, window: &str);

    /// Attach resize handles to a window
    fn init_resize(&mut self, window: &str, handles: &[ResizeHandle]);

    /// Forget a window (it has been evicted)
    fn release(&mut self, window: &str);

    /// Pointer went down on `target` of `window`, currently at `rect`.
    /// Returns false if the target was never registered.
    fn begin(&mut self, window: &str, target: DragTarget, pointer: Vec2, rect: Rect) -> bool;

    /// Pointer moved; returns the live geometry of the dragged window
    fn update(&mut self, pointer: Vec2) -> Option<(WindowId, Rect)>;

    /// Pointer released; returns the final geometry
    fn finish(&mut self, pointer: Vec2) -> Option<(WindowId, Rect)>;

    /// Abandon the current drag without reporting geometry
    fn cancel(&mut self);

    /// Window currently being dragged
    fn dragging(&self) -> Option<&str>;
}
