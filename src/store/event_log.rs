//! Shared operation history log.
//!
//! Every view that performs a loggable action holds a clone of the same
//! [`EventLog`] and calls [`EventLog::add_event`]; the log stamps id,
//! timestamp and user before appending.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;

use crate::error::Result;
use crate::logging::structured::LogContext;
use crate::record::{EventAction, HistoryEvent, RecordId};

use super::record_store::RecordStore;

/// Cloneable handle to the history store.
#[derive(Debug, Clone)]
pub struct EventLog {
    inner: Arc<Mutex<RecordStore<HistoryEvent>>>,
    user: Option<String>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(LogContext::generate())
    }
}

impl EventLog {
    pub fn new(ctx: LogContext) -> Self {
        Self::from_store(RecordStore::new(ctx.with_view("history")))
    }

    pub fn from_store(store: RecordStore<HistoryEvent>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
            user: None,
        }
    }

    /// Handle that stamps `user` on the events it adds.
    pub fn with_user(&self, user: Option<&str>) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            user: user.map(str::to_string),
        }
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Record a completed action now.
    pub fn add_event(&self, action: EventAction, file: Option<&str>) -> Result<HistoryEvent> {
        self.add_event_at(action, file, Utc::now())
    }

    /// Record a completed action at `at`.
    pub fn add_event_at(
        &self,
        action: EventAction,
        file: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<HistoryEvent> {
        let event = HistoryEvent {
            id: RecordId::UNASSIGNED,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            user: self.user.clone(),
            action,
            file: file.map(str::to_string),
        };
        self.inner.lock().add(event)
    }

    /// Append a fully formed event (e.g. one restored from disk).
    pub fn insert(&self, event: HistoryEvent) -> Result<HistoryEvent> {
        self.inner.lock().add(event)
    }

    pub fn delete_event(&self, id: RecordId) -> bool {
        self.inner.lock().delete(id)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of all events, insertion order.
    pub fn snapshot(&self) -> Vec<HistoryEvent> {
        self.inner.lock().list().to_vec()
    }

    /// Run `f` against the store while holding the lock.
    pub fn read<T>(&self, f: impl FnOnce(&RecordStore<HistoryEvent>) -> T) -> T {
        f(&self.inner.lock())
    }
}
