//! Re-run dispatch for history events.

use serde_json::{Map, Value};

use crate::export::CSV_MIME_TYPE;
use crate::record::{HistoryEvent, Record, ScreenState, EXPORT_CSV, EXPORT_PNG, FILTER_CSV, UPLOAD_CSV};

pub const UPLOAD_ROUTE: &str = "/analytics/upload";
pub const FILTER_ROUTE: &str = "/analytics/filter";

/// What the shell should do to repeat a stored event.
#[derive(Debug, Clone, PartialEq)]
pub enum RerunAction {
    /// Open a screen with the event params as its initial state.
    Navigate {
        route: &'static str,
        state: ScreenState,
    },
    /// Trigger a download under the stored file name.
    Download {
        file_name: String,
        mime_type: &'static str,
        content: String,
    },
    /// Open a stored file URL.
    OpenUrl(String),
}

/// Resolve `event` by type. Unknown types, and exports without a stored
/// file, resolve to nothing.
pub fn rerun(event: &HistoryEvent) -> Option<RerunAction> {
    let navigate = |route| RerunAction::Navigate {
        route,
        state: match event.action.params() {
            Value::Object(map) => map,
            _ => Map::new(),
        },
    };

    let action = match event.category() {
        UPLOAD_CSV => Some(navigate(UPLOAD_ROUTE)),
        FILTER_CSV => Some(navigate(FILTER_ROUTE)),
        EXPORT_CSV => event.file.as_ref().map(|file| RerunAction::Download {
            file_name: file.clone(),
            mime_type: CSV_MIME_TYPE,
            content: String::new(),
        }),
        EXPORT_PNG => event.file.as_ref().map(|url| RerunAction::OpenUrl(url.clone())),
        _ => None,
    };

    log::debug!(
        "RERUN_DISPATCH id={} type={} resolved={}",
        event.id,
        event.category(),
        action.is_some()
    );
    action
}
