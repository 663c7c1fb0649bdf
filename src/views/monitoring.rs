//! Equipment monitoring view.
//!
//! Holds the entry store, the add/edit form, the period filter and the
//! two-phase delete confirmation. Every completed mutation and export is
//! also written to the shared history log.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::config::AppConfig;
use crate::error::{LogError, Result};
use crate::export::{monitoring_columns, CsvExporter, ExportArtifact, MONITORING_EXPORT_PREFIX};
use crate::format::values::format_column;
use crate::logging::structured::LogContext;
use crate::query::Period;
use crate::record::{equipment_list, EventAction, MonitoringEntry, Record, RecordId};
use crate::store::{EventLog, RecordStore};

use super::notify::{Notifier, Toast};

pub const TOAST_ADDED: &str = "Жазба қосылды";
pub const TOAST_UPDATED: &str = "Жазба жаңартылды";
pub const TOAST_DELETED: &str = "Жазба өшірілді";
pub const TOAST_EXPORTED: &str = "CSV экспортталды";

/// Delete confirmation state. At most one deletion is pending; a new
/// request replaces the previous target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteConfirmation {
    #[default]
    Idle,
    Pending(RecordId),
}

/// Source of the instant a toast is shown at.
pub type Clock = Arc<dyn Fn() -> Instant + Send + Sync>;

/// State behind the monitoring page.
pub struct MonitoringView {
    store: RecordStore<MonitoringEntry>,
    history: EventLog,
    form: MonitoringEntry,
    editing: Option<RecordId>,
    errors: BTreeMap<String, String>,
    period: Period,
    confirmation: DeleteConfirmation,
    notifier: Notifier,
    exporter: CsvExporter<MonitoringEntry>,
    clock: Clock,
    ctx: LogContext,
}

impl fmt::Debug for MonitoringView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitoringView")
            .field("records", &self.store.len())
            .field("editing", &self.editing)
            .field("period", &self.period)
            .field("confirmation", &self.confirmation)
            .finish()
    }
}

impl MonitoringView {
    pub fn new(history: EventLog, config: &AppConfig, ctx: &LogContext) -> Self {
        let ctx = ctx.with_view("monitoring");
        Self::with_store(RecordStore::new(ctx.clone()), history, config, &ctx)
    }

    /// View over an existing (e.g. restored) store.
    pub fn with_store(
        store: RecordStore<MonitoringEntry>,
        history: EventLog,
        config: &AppConfig,
        ctx: &LogContext,
    ) -> Self {
        Self {
            store,
            history,
            form: Self::initial_form(),
            editing: None,
            errors: BTreeMap::new(),
            period: Period::default(),
            confirmation: DeleteConfirmation::Idle,
            notifier: Notifier::default(),
            exporter: CsvExporter::new(monitoring_columns()).with_dialect(config.csv_dialect),
            clock: Arc::new(Instant::now),
            ctx: ctx.with_view("monitoring"),
        }
    }

    /// Replace the clock toasts are stamped with.
    pub fn with_clock(mut self, clock: impl Fn() -> Instant + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn notify(&mut self, message: &str) {
        let at = (self.clock)();
        self.notifier.show_at(message, at);
    }

    /// Empty form with the first machine selected.
    pub fn initial_form() -> MonitoringEntry {
        let first = equipment_list()
            .into_iter()
            .next()
            .map(|eq| eq.code)
            .unwrap_or_default();
        MonitoringEntry::blank(&first)
    }

    pub fn store(&self) -> &RecordStore<MonitoringEntry> {
        &self.store
    }

    pub fn form(&self) -> &MonitoringEntry {
        &self.form
    }

    pub fn editing(&self) -> Option<RecordId> {
        self.editing
    }

    /// Field-level validation messages from the last save attempt.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Set a form field by wire name; clears that field's error.
    /// Returns false for an unknown field.
    pub fn set_field(&mut self, name: &str, value: &str) -> bool {
        match self.form.field_mut(name) {
            Some(slot) => {
                *slot = value.to_string();
                self.errors.remove(name);
                true
            }
            None => false,
        }
    }

    fn reset_form(&mut self) {
        self.form = Self::initial_form();
        self.editing = None;
    }

    /// Add the form as a new entry, or update the entry being edited.
    pub fn save(&mut self) -> Result<MonitoringEntry> {
        if let Err(e) = self.form.validate() {
            if let LogError::Validation { field, message } = &e {
                self.errors.insert(field.clone(), message.clone());
            }
            log::warn!("{} SAVE_REJECTED error={}", self.ctx, e);
            return Err(e);
        }

        let mut record = self.form.clone();
        let (saved, action, toast) = match self.editing {
            Some(id) => {
                record.set_id(id);
                self.store.update(record.clone())?;
                (record, EventAction::EditRecord { id }, TOAST_UPDATED)
            }
            None => {
                record.set_id(RecordId::UNASSIGNED);
                let saved = self.store.add(record)?;
                let id = saved.id();
                (saved, EventAction::AddRecord { id }, TOAST_ADDED)
            }
        };

        self.notify(toast);
        self.reset_form();
        self.history.add_event(action, None)?;
        Ok(saved)
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }

    /// Entries inside the period window, newest first.
    pub fn displayed(&self, now: DateTime<Utc>) -> Vec<&MonitoringEntry> {
        let mut entries = self.period.apply(self.store.list(), now);
        entries.reverse();
        entries
    }

    /// Formatted cells of one entry, column order.
    pub fn display_cells(entry: &MonitoringEntry) -> Vec<String> {
        let mut cells = vec![entry.eq.clone(), entry.date.clone()];
        cells.extend(
            crate::record::MetricField::ALL
                .iter()
                .map(|f| format_column(f.key(), entry.metric(*f))),
        );
        cells
    }

    /// Load an entry into the form for editing.
    pub fn edit(&mut self, id: RecordId) -> bool {
        match self.store.get(id) {
            Some(entry) => {
                self.form = entry.clone();
                self.editing = Some(id);
                self.errors.clear();
                true
            }
            None => false,
        }
    }

    /// [`MonitoringView::edit`] by position in the displayed table.
    pub fn edit_displayed(&mut self, index: usize, now: DateTime<Utc>) -> bool {
        match self.displayed_id(index, now) {
            Some(id) => self.edit(id),
            None => false,
        }
    }

    fn displayed_id(&self, index: usize, now: DateTime<Utc>) -> Option<RecordId> {
        self.displayed(now).get(index).map(|e| e.id)
    }

    pub fn confirmation(&self) -> DeleteConfirmation {
        self.confirmation
    }

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: RecordId) {
        if let DeleteConfirmation::Pending(previous) = self.confirmation {
            log::debug!(
                "{} DELETE_PENDING_REPLACED previous={} next={}",
                self.ctx,
                previous,
                id
            );
        }
        self.confirmation = DeleteConfirmation::Pending(id);
    }

    /// [`MonitoringView::request_delete`] by position in the displayed table.
    pub fn request_delete_displayed(&mut self, index: usize, now: DateTime<Utc>) -> bool {
        match self.displayed_id(index, now) {
            Some(id) => {
                self.request_delete(id);
                true
            }
            None => false,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirmation = DeleteConfirmation::Idle;
    }

    /// Perform the pending deletion. Returns the removed id, or `None` when
    /// nothing was pending or the record is already gone.
    pub fn confirm_delete(&mut self) -> Result<Option<RecordId>> {
        let DeleteConfirmation::Pending(id) = std::mem::take(&mut self.confirmation) else {
            return Ok(None);
        };

        if !self.store.delete(id) {
            log::warn!("{} DELETE_TARGET_MISSING id={}", self.ctx, id);
            return Ok(None);
        }
        self.notify(TOAST_DELETED);
        if self.editing == Some(id) {
            self.reset_form();
        }
        self.history
            .add_event(EventAction::DeleteRecord { id }, None)?;
        Ok(Some(id))
    }

    /// CSV of every entry in insertion order, or `None` when the store is
    /// empty. A successful export is logged to the history.
    pub fn export_csv(&mut self, now: DateTime<Utc>) -> Result<Option<ExportArtifact>> {
        let artifact =
            self.exporter
                .export(self.store.list(), MONITORING_EXPORT_PREFIX, now, &self.ctx)?;

        if let Some(artifact) = &artifact {
            self.notify(TOAST_EXPORTED);
            self.history.add_event(
                EventAction::ExportCsv {
                    count: artifact.row_count,
                },
                Some(&artifact.file_name),
            )?;
        }
        Ok(artifact)
    }

    /// Toast visible at `now`.
    pub fn toast(&self, now: Instant) -> Option<&Toast> {
        self.notifier.active(now)
    }
}
