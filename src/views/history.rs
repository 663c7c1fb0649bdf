//! Operation history view.
//!
//! KPIs are counted over the whole log; the table and the CSV download use
//! the filtered subset.

use chrono::{DateTime, Utc};

use crate::config::{AppConfig, DisplaySettings};
use crate::error::Result;
use crate::export::{history_columns, CsvExporter, ExportArtifact, HISTORY_EXPORT_PREFIX};
use crate::format::timestamp::format_timestamp;
use crate::logging::structured::LogContext;
use crate::query::{aggregate, filter, FilterSpec};
use crate::record::{
    HistoryEvent, RecordId, EXPORT_CSV, EXPORT_PNG, FILTER_CSV, HISTORY_KPI_KEYS, UPLOAD_CSV,
};
use crate::store::EventLog;

use super::rerun::{rerun, RerunAction};

/// Placeholder shown for an event without a file.
pub const NO_FILE: &str = "—";

/// Display label of an event type; unknown types show as-is.
pub fn event_label(kind: &str) -> &str {
    match kind {
        UPLOAD_CSV => "CSV жүктеу",
        FILTER_CSV => "CSV сүзгілеу",
        EXPORT_CSV => "CSV экспорттау",
        EXPORT_PNG => "PNG экспорттау",
        other => other,
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: RecordId,
    pub time: String,
    pub user: String,
    pub action: String,
    /// Params as indented JSON.
    pub params: String,
    pub file: String,
}

/// State behind the history page.
pub struct HistoryView {
    log: EventLog,
    filter: FilterSpec,
    settings: DisplaySettings,
    exporter: CsvExporter<HistoryEvent>,
    ctx: LogContext,
}

impl HistoryView {
    pub fn new(log: EventLog, config: &AppConfig, ctx: &LogContext) -> Self {
        Self {
            log,
            filter: FilterSpec::new(&HISTORY_KPI_KEYS),
            settings: config.display.clone(),
            exporter: CsvExporter::new(history_columns()).with_dialect(config.csv_dialect),
            ctx: ctx.with_view("history"),
        }
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    pub fn set_search(&mut self, query: &str) {
        self.filter.query = query.to_string();
    }

    pub fn set_date_from(&mut self, date: Option<&str>) {
        self.filter.date_from = date.map(str::to_string);
    }

    pub fn set_date_to(&mut self, date: Option<&str>) {
        self.filter.date_to = date.map(str::to_string);
    }

    pub fn toggle_event_type(&mut self, kind: &str) {
        self.filter.toggle_category(kind);
    }

    /// Settings changed elsewhere (locale, clock).
    pub fn set_display_settings(&mut self, settings: DisplaySettings) {
        self.settings = settings;
    }

    /// Events passing the current filter, log order.
    pub fn visible(&self) -> Vec<HistoryEvent> {
        self.log.read(|store| {
            filter::apply_logged(store.list(), &self.filter, &self.ctx)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    /// Count per KPI event type over the unfiltered log, display order.
    pub fn kpis(&self) -> Vec<(&'static str, usize)> {
        let counts = self
            .log
            .read(|store| aggregate::count(store.list(), &HISTORY_KPI_KEYS));
        HISTORY_KPI_KEYS
            .iter()
            .map(|&key| (key, counts.get(key).copied().unwrap_or(0)))
            .collect()
    }

    /// Table rows for the visible events.
    pub fn rows(&self) -> Vec<HistoryRow> {
        self.visible()
            .into_iter()
            .map(|event| HistoryRow {
                id: event.id,
                time: format_timestamp(&event.timestamp, &self.settings),
                user: event.user.clone().unwrap_or_default(),
                action: event_label(event.action.kind()).to_string(),
                params: serde_json::to_string_pretty(&event.action.params()).unwrap_or_default(),
                file: event.file.clone().unwrap_or_else(|| NO_FILE.to_string()),
            })
            .collect()
    }

    /// CSV of the visible events, or `None` when nothing is visible.
    pub fn export_csv(&self, now: DateTime<Utc>) -> Result<Option<ExportArtifact>> {
        let visible = self.visible();
        self.exporter
            .export(&visible, HISTORY_EXPORT_PREFIX, now, &self.ctx)
    }

    /// Resolve the re-run action for a stored event.
    pub fn rerun(&self, id: RecordId) -> Option<RerunAction> {
        let event = self.log.read(|store| store.get(id).cloned())?;
        log::info!("{} RERUN_REQUESTED id={} kind={}", self.ctx, id, event.action.kind());
        rerun(&event)
    }

    pub fn delete(&self, id: RecordId) -> bool {
        self.log.delete_event(id)
    }

    /// Empty the whole log. Irreversible.
    pub fn clear(&self) {
        log::warn!("{} HISTORY_CLEAR_REQUESTED events={}", self.ctx, self.log.len());
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EventAction;
    use chrono::TimeZone;
    use serde_json::Map;

    fn view_with(events: &[(&str, EventAction)]) -> HistoryView {
        let ctx = LogContext::new("s");
        let log = EventLog::new(ctx.clone()).with_user(Some("admin"));
        for (ts, action) in events {
            let at = DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc);
            log.add_event_at(action.clone(), None, at).unwrap();
        }
        HistoryView::new(log, &AppConfig::default(), &ctx)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_kpis_ignore_filters() {
        let mut view = view_with(&[
            ("2024-01-05T09:00:00Z", EventAction::UploadCsv(Map::new())),
            ("2024-01-10T09:00:00Z", EventAction::FilterCsv(Map::new())),
            ("2024-02-01T09:00:00Z", EventAction::UploadCsv(Map::new())),
            ("2024-02-02T09:00:00Z", EventAction::AddRecord { id: RecordId(1) }),
        ]);
        view.set_search("nothing-matches-this");

        assert!(view.visible().is_empty());
        assert_eq!(
            view.kpis(),
            vec![(UPLOAD_CSV, 2), (FILTER_CSV, 1), (EXPORT_CSV, 0), (EXPORT_PNG, 0)]
        );
    }

    #[test]
    fn test_toggle_and_date_filters() {
        let mut view = view_with(&[
            ("2024-01-05T09:00:00Z", EventAction::UploadCsv(Map::new())),
            ("2024-01-10T09:00:00Z", EventAction::FilterCsv(Map::new())),
            ("2024-02-01T09:00:00Z", EventAction::UploadCsv(Map::new())),
        ]);
        view.set_date_to(Some("2024-01-31"));
        assert_eq!(view.visible().len(), 2);

        view.toggle_event_type(FILTER_CSV);
        let visible = view.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].action.kind(), UPLOAD_CSV);
    }

    #[test]
    fn test_rows_render_labels_and_placeholders() {
        let view = view_with(&[("2024-01-05T09:00:00Z", EventAction::ExportCsv { count: 2 })]);
        let rows = view.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].time, "05.01.2024, 09:00:00");
        assert_eq!(rows[0].user, "admin");
        assert_eq!(rows[0].action, "CSV экспорттау");
        assert_eq!(rows[0].params, "{\n  \"count\": 2\n}");
        assert_eq!(rows[0].file, NO_FILE);
    }

    #[test]
    fn test_export_uses_filtered_view() {
        let mut view = view_with(&[
            ("2024-01-05T09:00:00Z", EventAction::UploadCsv(Map::new())),
            ("2024-02-01T09:00:00Z", EventAction::ExportCsv { count: 9 }),
        ]);
        view.set_date_from(Some("2024-02-01"));

        let artifact = view.export_csv(now()).unwrap().unwrap();
        assert_eq!(artifact.row_count, 1);
        assert_eq!(artifact.file_name, format!("history_{}.csv", now().timestamp_millis()));
        assert_eq!(artifact.content.lines().count(), 2);
    }

    #[test]
    fn test_export_with_nothing_visible_is_skipped() {
        let view = view_with(&[]);
        assert_eq!(view.export_csv(now()), Ok(None));
    }

    #[test]
    fn test_delete_clear_and_rerun() {
        let view = view_with(&[
            ("2024-01-05T09:00:00Z", EventAction::UploadCsv(Map::new())),
            ("2024-01-06T09:00:00Z", EventAction::ExportCsv { count: 1 }),
        ]);
        let first = view.visible()[0].id;

        assert!(matches!(view.rerun(first), Some(RerunAction::Navigate { .. })));
        assert!(view.delete(first));
        assert_eq!(view.rerun(first), None);
        assert!(!view.delete(first));

        view.clear();
        assert!(view.visible().is_empty());
    }

    #[test]
    fn test_event_label_fallback() {
        assert_eq!(event_label(UPLOAD_CSV), "CSV жүктеу");
        assert_eq!(event_label("Delete Record"), "Delete Record");
    }
}
