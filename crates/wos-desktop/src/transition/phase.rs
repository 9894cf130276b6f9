use serde::Serialize;

use crate::scheduler::TimerId;

/// Which animated transition a window is running
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    Minimize,
    Maximize,
    Restore,
    Close,
}

impl TransitionKind {
    /// Transient CSS class applied while the transition runs
    pub fn css_class(self) -> &'static str {
        match self {
            TransitionKind::Minimize => "minimizing",
            TransitionKind::Maximize => "maximizing",
            TransitionKind::Restore => "restoring",
            TransitionKind::Close => "window-closing",
        }
    }
}

/// Transition state machine: `Idle -> Transitioning -> Settled`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TransitionPhase {
    /// No transition has run since the window opened
    #[default]
    Idle,
    /// A transition is playing; `timer` settles it
    Transitioning {
        kind: TransitionKind,
        timer: TimerId,
        started_ms: f64,
    },
    /// The last transition has completed
    Settled(TransitionKind),
}

impl TransitionPhase {
    /// The transition currently playing, if any
    pub fn active(&self) -> Option<TransitionKind> {
        match self {
            TransitionPhase::Transitioning { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Timer that will settle the current transition
    pub fn timer(&self) -> Option<TimerId> {
        match self {
            TransitionPhase::Transitioning { timer, .. } => Some(*timer),
            _ => None,
        }
    }

    /// Check whether `kind` is the transition currently playing
    pub fn is(&self, kind: TransitionKind) -> bool {
        self.active() == Some(kind)
    }
}
