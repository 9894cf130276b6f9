//! Desktop Applications for the Web Desktop
//!
//! Everything above the window layer:
//! - The tabbed terminal app and its builtin command language
//! - The app registry used by desktop icons and the `open` command
//! - The AI assistant contract with offline fallbacks
//! - [`System`], the composition root wiring one desktop together
//!
//! ## Architecture
//!
//! - [`terminal`]: [`AdvancedTerminalApp`], command table, simulated tree
//! - [`registry`]: [`AppRegistry`]
//! - [`ai`]: [`AiCompletion`], non-blocking requests and canned answers
//! - [`system`]: [`System`]
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use wos_apps::System;
//! use wos_desktop::{DesktopSettings, ManualClock};
//! use wos_terminal::NoEmulator;
//!
//! let mut system = System::new(
//!     DesktopSettings::default(),
//!     Rc::new(ManualClock::new(0.0)),
//!     None,
//!     Rc::new(NoEmulator),
//! );
//!
//! system.terminal_mut().execute_command("open notes");
//! assert!(system.windows().borrow().contains("notes"));
//! ```

pub mod ai;
pub mod error;
pub mod registry;
pub mod system;
pub mod terminal;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::*;

pub use ai::{AiAnswer, AiCompletion, AiReply, AiResponder, AiTask, PendingAnswer};
pub use error::{AppError, AppResult};
pub use registry::{AppEntry, AppRegistry};
pub use system::{AppSpec, System, DEFAULT_APPS};
pub use terminal::{AdvancedTerminalApp, CommandOutcome, CommandRegistry, TabId};
