//! Tabbed terminal app
//!
//! - [`app`]: [`AdvancedTerminalApp`], tabs over terminal engines
//! - [`commands`]: Builtin command table and dispatcher
//! - [`fs`]: Simulated directory tree for `cd` and `ls`

pub mod app;
pub mod commands;
pub mod fs;

pub use app::{AdvancedTerminalApp, Tab, TabId, TabView, TERMINAL_APP};
pub use commands::{
    AwaitingAi, Command, CommandContext, CommandOutcome, CommandRegistry, Handler,
    CODE_EDITOR_APP,
};
pub use fs::{Entry, FileTree, NodeKind};
