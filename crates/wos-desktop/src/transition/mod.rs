//! Window transitions
//!
//! Minimize, maximize and close each play a CSS transition before (or
//! while) the logical state settles. A window's [`TransitionPhase`]
//! records which transition is in flight and the timer that ends it;
//! the timer firing is the only way out of `Transitioning`.
//!
//! Snapping after a drag is animated separately by [`SnapAnimation`].

mod phase;
mod snap;

pub use phase::{TransitionKind, TransitionPhase};
pub use snap::SnapAnimation;
