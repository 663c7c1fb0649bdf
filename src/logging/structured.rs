//! Structured logging utilities.
//!
//! Provides context-aware logging with session_id and view included
//! in every log message.

use std::fmt;

use uuid::Uuid;

/// Logging context for one dashboard session.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub session_id: String,
    pub view: Option<String>,
}

impl LogContext {
    pub fn new(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            view: None,
        }
    }

    /// Context with a freshly generated session id.
    pub fn generate() -> Self {
        Self::new(&format!("session-{}", &Uuid::new_v4().to_string()[..8]))
    }

    pub fn with_view(&self, view: &str) -> Self {
        Self {
            session_id: self.session_id.clone(),
            view: Some(view.to_string()),
        }
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.view {
            Some(view) => write!(f, "[session={}] [view={}]", self.session_id, view),
            None => write!(f, "[session={}]", self.session_id),
        }
    }
}
