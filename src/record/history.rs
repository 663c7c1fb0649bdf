//! Operation history events.
//!
//! The wire shape is `{id, timestamp, user, type, params, file}`. Internally
//! `type` + `params` are folded into [`EventAction`], one variant per event
//! type with its own field list.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::Result;

use super::{require_iso_date, Record, RecordId};

pub const UPLOAD_CSV: &str = "Upload CSV";
pub const FILTER_CSV: &str = "Filter CSV";
pub const EXPORT_CSV: &str = "Export CSV";
pub const EXPORT_PNG: &str = "Export PNG";
pub const ADD_RECORD: &str = "Add Record";
pub const EDIT_RECORD: &str = "Edit Record";
pub const DELETE_RECORD: &str = "Delete Record";

/// Event types shown as KPI cards and filter toggles, in display order.
pub const HISTORY_KPI_KEYS: [&str; 4] = [UPLOAD_CSV, FILTER_CSV, EXPORT_CSV, EXPORT_PNG];

/// Navigation state handed back to the upload/filter screens on re-run.
pub type ScreenState = Map<String, Value>;

/// What happened, keyed by event type.
#[derive(Debug, Clone, PartialEq)]
pub enum EventAction {
    UploadCsv(ScreenState),
    FilterCsv(ScreenState),
    ExportCsv { count: usize },
    ExportPng(ScreenState),
    AddRecord { id: RecordId },
    EditRecord { id: RecordId },
    DeleteRecord { id: RecordId },
    /// Unrecognised type, or params that do not fit the typed variant.
    Other { kind: String, params: Value },
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CountParams {
    count: usize,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct IdParams {
    id: RecordId,
}

impl EventAction {
    /// Build an action from its wire form. Never fails: anything that does
    /// not match a typed variant is kept verbatim as `Other`.
    pub fn from_parts(kind: &str, params: Value) -> Self {
        let typed = match kind {
            UPLOAD_CSV => screen_state(&params).map(EventAction::UploadCsv),
            FILTER_CSV => screen_state(&params).map(EventAction::FilterCsv),
            EXPORT_PNG => screen_state(&params).map(EventAction::ExportPng),
            EXPORT_CSV => serde_json::from_value::<CountParams>(params.clone())
                .ok()
                .map(|p| EventAction::ExportCsv { count: p.count }),
            ADD_RECORD | EDIT_RECORD | DELETE_RECORD => {
                serde_json::from_value::<IdParams>(params.clone())
                    .ok()
                    .map(|p| match kind {
                        ADD_RECORD => EventAction::AddRecord { id: p.id },
                        EDIT_RECORD => EventAction::EditRecord { id: p.id },
                        _ => EventAction::DeleteRecord { id: p.id },
                    })
            }
            _ => None,
        };

        typed.unwrap_or_else(|| EventAction::Other {
            kind: kind.to_string(),
            params,
        })
    }

    pub fn kind(&self) -> &str {
        match self {
            EventAction::UploadCsv(_) => UPLOAD_CSV,
            EventAction::FilterCsv(_) => FILTER_CSV,
            EventAction::ExportCsv { .. } => EXPORT_CSV,
            EventAction::ExportPng(_) => EXPORT_PNG,
            EventAction::AddRecord { .. } => ADD_RECORD,
            EventAction::EditRecord { .. } => EDIT_RECORD,
            EventAction::DeleteRecord { .. } => DELETE_RECORD,
            EventAction::Other { kind, .. } => kind.as_str(),
        }
    }

    /// Params in their wire form.
    pub fn params(&self) -> Value {
        match self {
            EventAction::UploadCsv(state)
            | EventAction::FilterCsv(state)
            | EventAction::ExportPng(state) => Value::Object(state.clone()),
            EventAction::ExportCsv { count } => json!({ "count": count }),
            EventAction::AddRecord { id }
            | EventAction::EditRecord { id }
            | EventAction::DeleteRecord { id } => json!({ "id": id }),
            EventAction::Other { params, .. } => params.clone(),
        }
    }
}

fn screen_state(params: &Value) -> Option<ScreenState> {
    params.as_object().cloned()
}

/// One entry of the operation history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHistoryEvent", into = "RawHistoryEvent")]
pub struct HistoryEvent {
    pub id: RecordId,
    /// ISO-8601 date-time.
    pub timestamp: String,
    pub user: Option<String>,
    pub action: EventAction,
    /// Generated file name or URL.
    pub file: Option<String>,
}

impl HistoryEvent {
    pub fn new(timestamp: &str, action: EventAction) -> Self {
        Self {
            id: RecordId::UNASSIGNED,
            timestamp: timestamp.to_string(),
            user: None,
            action,
            file: None,
        }
    }

    pub fn with_user(mut self, user: &str) -> Self {
        self.user = Some(user.to_string());
        self
    }

    pub fn with_file(mut self, file: &str) -> Self {
        self.file = Some(file.to_string());
        self
    }
}

impl Record for HistoryEvent {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn category(&self) -> &str {
        self.action.kind()
    }

    fn validate(&self) -> Result<()> {
        require_iso_date("timestamp", &self.timestamp, "timestamp is required")
    }
}

#[derive(Serialize, Deserialize)]
struct RawHistoryEvent {
    #[serde(default)]
    id: RecordId,
    #[serde(default)]
    timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file: Option<String>,
}

impl From<RawHistoryEvent> for HistoryEvent {
    fn from(raw: RawHistoryEvent) -> Self {
        Self {
            id: raw.id,
            timestamp: raw.timestamp,
            user: raw.user,
            action: EventAction::from_parts(&raw.kind, raw.params),
            file: raw.file,
        }
    }
}

impl From<HistoryEvent> for RawHistoryEvent {
    fn from(event: HistoryEvent) -> Self {
        Self {
            id: event.id,
            timestamp: event.timestamp,
            user: event.user,
            kind: event.action.kind().to_string(),
            params: event.action.params(),
            file: event.file,
        }
    }
}
