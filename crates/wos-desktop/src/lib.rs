//! Window Manager for the Web Desktop
//!
//! This crate provides the window layer of the desktop:
//! - Window lifecycle (open, focus, minimize, maximize, close)
//! - Single-active-window focus with a monotonically increasing z-index
//! - Viewport containment and edge snapping after drags
//! - Debounced position persistence through a key-value store
//! - A taskbar model rebuilt after every state change
//!
//! ## Architecture
//!
//! - [`math`]: Geometry types (`Vec2`, `Rect`, `Size`)
//! - [`window`]: Window table, lifecycle state machine, [`WindowManager`]
//! - [`transition`]: Transition phases and snap animation
//! - [`input`]: Drag manager contract and default pointer implementation
//! - [`persistence`]: Window position records
//! - [`taskbar`]: Taskbar entries and pinned icons
//! - [`scheduler`]: Cancellable deferred tasks
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use wos_desktop::{DesktopSettings, ManualClock, WindowConfig, WindowManager};
//!
//! let clock = ManualClock::new(0.0);
//! let mut wm = WindowManager::new(DesktopSettings::default(), Rc::new(clock.clone()))
//!     .with_viewport(1024.0, 768.0);
//!
//! wm.create_window("notes", WindowConfig::new("Notes").with_size(800.0, 700.0));
//! wm.close_window("notes");
//!
//! clock.advance(300.0);
//! wm.tick();
//! assert!(!wm.contains("notes"));
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All state is plain Rust, testable without a browser
//! 2. **Time Abstraction**: Deferred work reads an injectable [`Clock`]
//! 3. **Best-effort persistence**: Storage problems never reach callers

pub mod activity;
pub mod clock;
pub mod error;
pub mod input;
pub mod math;
pub mod persistence;
pub mod scheduler;
pub mod settings;
pub mod taskbar;
pub mod transition;
pub mod types;
pub mod viewport;
pub mod window;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::*;

pub use activity::{ActivityEvent, ActivityLog, ActivityTracker};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{DesktopError, DesktopResult};
pub use input::{DragManager, DragTarget, PointerDrag, ResizeHandle};
pub use math::{Rect, Size, Vec2};
pub use persistence::{PositionStore, WindowPosition, WINDOWS_KEY};
pub use settings::DesktopSettings;
pub use taskbar::{PinnedApp, Taskbar, TaskbarItem};
pub use transition::{SnapAnimation, TransitionKind, TransitionPhase};
pub use types::{Generation, WindowId};
pub use viewport::Viewport;
pub use window::{
    Window, WindowConfig, WindowHandle, WindowHooks, WindowManager, WindowState, WindowView,
};
