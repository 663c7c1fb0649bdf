//! Configuration.
//!
//! `DisplaySettings` is what the settings collaborator hands to the
//! timestamp formatter; `AppConfig` bundles it with the remaining knobs and
//! can be read from `DASHLOG_*` environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};

use crate::export::CsvDialect;

/// Locale used when none is configured or the configured one is unknown.
pub const DEFAULT_LANGUAGE: &str = "kk-KZ";

/// 12- or 24-hour clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockFormat {
    #[serde(rename = "12")]
    H12,
    #[default]
    #[serde(rename = "24")]
    H24,
}

impl FromStr for ClockFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "12" => Ok(ClockFormat::H12),
            "24" => Ok(ClockFormat::H24),
            other => Err(anyhow!("unknown time format {:?}, expected \"12\" or \"24\"", other)),
        }
    }
}

impl fmt::Display for ClockFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockFormat::H12 => write!(f, "12"),
            ClockFormat::H24 => write!(f, "24"),
        }
    }
}

/// Locale and clock format for rendering timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    #[serde(default)]
    pub time_format: ClockFormat,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            time_format: ClockFormat::default(),
            language: default_language(),
        }
    }
}

/// Everything a dashboard session needs to be configured.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub display: DisplaySettings,
    pub csv_dialect: CsvDialect,
    /// Acting principal stamped on history events.
    pub user: Option<String>,
    pub log_level: log::LevelFilter,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            display: DisplaySettings::default(),
            csv_dialect: CsvDialect::default(),
            user: None,
            log_level: log::LevelFilter::Info,
        }
    }
}

impl AppConfig {
    /// Read `DASHLOG_TIME_FORMAT`, `DASHLOG_LANGUAGE`, `DASHLOG_CSV_DIALECT`,
    /// `DASHLOG_USER` and `DASHLOG_LOG_LEVEL`; unset variables keep defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("DASHLOG_TIME_FORMAT") {
            config.display.time_format = v.parse().context("invalid DASHLOG_TIME_FORMAT")?;
        }
        if let Some(v) = lookup("DASHLOG_LANGUAGE").filter(|v| !v.trim().is_empty()) {
            config.display.language = v.trim().to_string();
        }
        if let Some(v) = lookup("DASHLOG_CSV_DIALECT") {
            config.csv_dialect = v.parse().context("invalid DASHLOG_CSV_DIALECT")?;
        }
        config.user = lookup("DASHLOG_USER").filter(|v| !v.trim().is_empty());
        if let Some(v) = lookup("DASHLOG_LOG_LEVEL") {
            config.log_level = v
                .parse()
                .map_err(|_| anyhow!("unknown log level {:?}", v))
                .context("invalid DASHLOG_LOG_LEVEL")?;
        }

        Ok(config)
    }
}
