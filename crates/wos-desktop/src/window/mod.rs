//! Window management module
//!
//! Provides the window table, lifecycle transitions, focus/z-order and
//! the post-drag pipeline.

mod config;
mod hooks;
mod manager;
mod record;
#[allow(clippy::module_inception)]
mod window;

pub use config::WindowConfig;
pub use hooks::WindowHooks;
pub use manager::{WindowHandle, WindowManager, WindowView};
pub use window::{Window, WindowState};

pub use crate::types::WindowId;
