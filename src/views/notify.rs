//! Auto-dismissing toast notifications.

use std::time::{Duration, Instant};

/// How long a toast stays visible.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= TOAST_LIFETIME
    }
}

/// Single toast slot; a new message replaces the current one.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    current: Option<Toast>,
}

impl Notifier {
    pub fn show_at(&mut self, message: &str, at: Instant) {
        self.current = Some(Toast {
            message: message.to_string(),
            shown_at: at,
        });
    }

    /// The toast still visible at `now`, if any.
    pub fn active(&self, now: Instant) -> Option<&Toast> {
        self.current.as_ref().filter(|t| !t.is_expired(now))
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}
