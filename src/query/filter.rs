//! Multi-predicate record filter.
//!
//! A record is visible when all of these hold:
//! 1. its day (`YYYY-MM-DD`) is >= `date_from`, when set
//! 2. its day is <= `date_to`, when set
//! 3. its category is enabled in `categories` (absent keys are excluded)
//! 4. its full JSON form contains `query`, case-insensitively
//!
//! Dates compare as strings, which is sound for fixed-width ISO dates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logging::structured::LogContext;
use crate::record::Record;

/// Live filter state of a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    /// Category key -> enabled.
    #[serde(default)]
    pub categories: BTreeMap<String, bool>,
}

impl FilterSpec {
    /// Empty query, no date bounds, every key in `keys` enabled.
    pub fn new(keys: &[&str]) -> Self {
        Self {
            query: String::new(),
            date_from: None,
            date_to: None,
            categories: keys.iter().map(|k| (k.to_string(), true)).collect(),
        }
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    pub fn with_dates(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.date_from = from.map(str::to_string);
        self.date_to = to.map(str::to_string);
        self
    }

    pub fn set_category(&mut self, key: &str, enabled: bool) {
        self.categories.insert(key.to_string(), enabled);
    }

    /// Flip a category toggle; an absent key becomes enabled.
    pub fn toggle_category(&mut self, key: &str) {
        let enabled = self.category_enabled(key);
        self.set_category(key, !enabled);
    }

    pub fn category_enabled(&self, key: &str) -> bool {
        self.categories.get(key).copied().unwrap_or(false)
    }

    /// Whether a single record passes every predicate.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        Matcher::new(self).matches(record)
    }
}

/// Filter state with the query lowercased once per pass.
struct Matcher<'a> {
    spec: &'a FilterSpec,
    needle: String,
}

impl<'a> Matcher<'a> {
    fn new(spec: &'a FilterSpec) -> Self {
        Self {
            spec,
            needle: spec.query.to_lowercase(),
        }
    }

    fn matches<R: Record>(&self, record: &R) -> bool {
        let day = record.day();

        if let Some(from) = non_empty(&self.spec.date_from) {
            if day < from {
                return false;
            }
        }
        if let Some(to) = non_empty(&self.spec.date_to) {
            if day > to {
                return false;
            }
        }
        if !self.spec.category_enabled(record.category()) {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }

        match serde_json::to_string(record) {
            Ok(json) => json.to_lowercase().contains(&self.needle),
            Err(e) => {
                log::warn!("FILTER_SERIALIZE_FAILED id={} error={}", record.id(), e);
                false
            }
        }
    }
}

fn non_empty(bound: &Option<String>) -> Option<&str> {
    bound.as_deref().filter(|s| !s.is_empty())
}

/// Matching subset of `records`, original relative order.
pub fn apply<'a, R: Record>(records: &'a [R], spec: &FilterSpec) -> Vec<&'a R> {
    let matcher = Matcher::new(spec);
    records.iter().filter(|r| matcher.matches(*r)).collect()
}

/// [`apply`] with a summary log line under `ctx`.
pub fn apply_logged<'a, R: Record>(
    records: &'a [R],
    spec: &FilterSpec,
    ctx: &LogContext,
) -> Vec<&'a R> {
    let visible = apply(records, spec);
    log::debug!(
        "{} FILTER_APPLIED total={} visible={} query={:?} date_from={:?} date_to={:?}",
        ctx,
        records.len(),
        visible.len(),
        spec.query,
        spec.date_from,
        spec.date_to
    );
    visible
}
