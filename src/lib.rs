//! Dashlog Core - record log behind the history and monitoring dashboards
//!
//! This crate provides the record handling shared by the operation history
//! page and the equipment monitoring page. The implementation prioritizes:
//!
//! 1. **Exactness** - filter, KPI and CSV output match the dashboards byte for byte
//! 2. **Logging** - every mutation and export logged with session context
//! 3. **Purity** - clocks and display settings are passed in, never read ambiently
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `record` - history events and monitoring entries
//! - `store` - id-unique ordered store, shared event log, JSON persistence
//! - `query` - filter engine, KPI aggregation, period window
//! - `export` - CSV serializer and column sets
//! - `format` - timestamp and metric rendering
//! - `views` - per-page state (filters, form, delete confirmation, toasts)
//! - `config` - display settings and environment configuration
//! - `logging` - structured logging with session context

pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod query;
pub mod record;
pub mod store;
pub mod views;

pub use config::{AppConfig, ClockFormat, DisplaySettings};
pub use error::{LogError, Result};
pub use logging::structured::LogContext;
pub use record::{EventAction, HistoryEvent, MonitoringEntry, Record, RecordId};
pub use store::{EventLog, RecordStore};
pub use views::{HistoryView, MonitoringView};

/// Initialize the process-wide logger. Later calls are no-ops.
pub fn init_logger(level: log::LevelFilter) {
    let _ = env_logger::builder()
        .filter_level(level)
        .format_timestamp_millis()
        .try_init();
}

/// One dashboard session: configuration plus the history log both views
/// write to.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: AppConfig,
    pub ctx: LogContext,
    history: EventLog,
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        let ctx = LogContext::generate();
        let history = EventLog::new(ctx.clone()).with_user(config.user.as_deref());

        log::info!(
            "{} SESSION_STARTED user={:?} language={} time_format={} csv_dialect={:?}",
            ctx,
            config.user,
            config.display.language,
            config.display.time_format,
            config.csv_dialect
        );

        Self {
            config,
            ctx,
            history,
        }
    }

    /// Session configured from `DASHLOG_*` variables, with logging set up.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        init_logger(config.log_level);
        Ok(Self::new(config))
    }

    pub fn history_log(&self) -> &EventLog {
        &self.history
    }

    pub fn history_view(&self) -> HistoryView {
        HistoryView::new(self.history.clone(), &self.config, &self.ctx)
    }

    pub fn monitoring_view(&self) -> MonitoringView {
        MonitoringView::new(self.history.clone(), &self.config, &self.ctx)
    }
}
