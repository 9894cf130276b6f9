//! Optional user-activity tracking hook
//!
//! When a tracker is attached, opening a window records an "app opened"
//! event and closing it records how many minutes it was open.

use std::cell::RefCell;

/// Receiver of app usage events
pub trait ActivityTracker {
    /// An app window was opened
    fn app_opened(&self, app_id: &str, title: &str);

    /// An app window was closed after `minutes` of use
    fn app_used(&self, app_id: &str, minutes: f64);
}

/// Recorded usage event
#[derive(Clone, Debug, PartialEq)]
pub enum ActivityEvent {
    Opened { app_id: String, title: String },
    Used { app_id: String, minutes: f64 },
}

/// In-memory tracker keeping every event
#[derive(Debug, Default)]
pub struct ActivityLog {
    events: RefCell<Vec<ActivityEvent>>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<ActivityEvent> {
        self.events.borrow().clone()
    }

    /// Total minutes recorded for an app
    pub fn minutes_for(&self, app_id: &str) -> f64 {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ActivityEvent::Used { app_id: id, minutes } if id == app_id => Some(*minutes),
                _ => None,
            })
            .sum()
    }
}

impl ActivityTracker for ActivityLog {
    fn app_opened(&self, app_id: &str, title: &str) {
        self.events.borrow_mut().push(ActivityEvent::Opened {
            app_id: app_id.to_string(),
            title: title.to_string(),
        });
    }

    fn app_used(&self, app_id: &str, minutes: f64) {
        self.events.borrow_mut().push(ActivityEvent::Used {
            app_id: app_id.to_string(),
            minutes,
        });
    }
}
