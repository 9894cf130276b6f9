//! Core geometry types for the desktop
//!
//! All values are CSS pixels relative to the top-left corner of the
//! browser viewport.

mod rect;
mod size;
mod vec2;

pub use rect::Rect;
pub use size::Size;
pub use vec2::Vec2;
