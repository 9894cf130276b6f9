//! Core type definitions for the window manager
//!
//! This module centralizes type aliases used throughout the crate
//! for consistency and discoverability.

/// Window identifier
///
/// Windows are keyed by the id of the app they host (`"notes"`,
/// `"terminal"`, ...). At most one window exists per id; the id becomes
/// free again once a closed window has been evicted.
pub type WindowId = String;

/// Monotonic counter distinguishing successive open/close cycles of the
/// same window id. Deferred tasks carry the generation they were
/// scheduled for and are dropped if it no longer matches.
pub type Generation = u64;
