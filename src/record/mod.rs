//! Record model.
//!
//! Two record variants share one shape (id, timestamp, category, params):
//! - `history` - operation history events
//! - `monitoring` - equipment monitoring entries

pub mod history;
pub mod monitoring;

pub use history::*;
pub use monitoring::*;

use std::fmt;
use std::fmt::Debug;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{LogError, Result};

lazy_static! {
    /// Fixed-width ISO date at the start of a timestamp.
    static ref ISO_DATE_PREFIX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap();
}

/// Store-assigned record identifier.
///
/// `RecordId(0)` means "not assigned yet"; the store replaces it on add.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    pub const UNASSIGNED: RecordId = RecordId(0);

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

/// Common surface of every log record.
pub trait Record: Clone + Debug + Serialize {
    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    /// ISO-8601 date or date-time.
    fn timestamp(&self) -> &str;

    /// Event type (history) or equipment code (monitoring).
    fn category(&self) -> &str;

    /// Check required fields before the record enters a store.
    fn validate(&self) -> Result<()>;

    /// `YYYY-MM-DD` part of the timestamp.
    fn day(&self) -> &str {
        let ts = self.timestamp();
        ts.get(..10).unwrap_or(ts)
    }
}

/// Reject empty or non-ISO date values for `field`.
pub(crate) fn require_iso_date(field: &str, value: &str, missing_message: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LogError::validation(field, missing_message));
    }
    if !ISO_DATE_PREFIX.is_match(value) {
        return Err(LogError::validation(field, "expected an ISO-8601 date (YYYY-MM-DD)"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_assignment_flag() {
        assert!(!RecordId::UNASSIGNED.is_assigned());
        assert!(RecordId(5).is_assigned());
        assert_eq!(RecordId::from(9).to_string(), "9");
    }

    #[test]
    fn test_require_iso_date() {
        assert!(require_iso_date("date", "2024-01-05", "missing").is_ok());
        assert!(require_iso_date("date", "2024-01-05T10:00:00Z", "missing").is_ok());

        let err = require_iso_date("date", "", "missing").unwrap_err();
        assert_eq!(err, LogError::validation("date", "missing"));

        assert!(require_iso_date("date", "05.01.2024", "missing").is_err());
    }
}
