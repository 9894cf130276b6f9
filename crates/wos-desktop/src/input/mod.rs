//! Pointer interaction with windows
//!
//! The window manager does not track pointers itself. It hands every
//! window to a [`DragManager`] when the window opens, forwards pointer
//! events while a drag is live, and runs its own post-processing (viewport
//! clamp, delayed snap, debounced save) once the drag manager reports the
//! final geometry on release.

mod drag;
mod pointer;
mod region;

pub use drag::{DragManager, DragTarget};
pub use pointer::{PointerDrag, MIN_WINDOW_SIZE};
pub use region::ResizeHandle;
