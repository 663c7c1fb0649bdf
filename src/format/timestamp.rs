//! Timestamp rendering for the history table.
//!
//! Pure: locale and clock format come in through [`DisplaySettings`]; the
//! instant is shown in the offset it was recorded with.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::config::{ClockFormat, DisplaySettings, DEFAULT_LANGUAGE};

/// Rendered for input that does not parse as a date.
pub const INVALID_DATE: &str = "Invalid Date";

/// Parse an ISO-8601 instant.
///
/// Accepts RFC 3339 date-times, offset-less date-times (taken as UTC) and
/// bare dates (UTC midnight).
pub fn parse_instant(iso: &str) -> Option<DateTime<FixedOffset>> {
    let iso = iso.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(dt);
    }

    let naive = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(iso, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(iso, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Some(Utc.from_utc_datetime(&naive).into())
}

/// strftime date pattern for a BCP 47 locale tag.
fn date_pattern(language: &str) -> Option<&'static str> {
    let primary = language.split(['-', '_']).next().unwrap_or("");
    match (language, primary) {
        ("en-GB", _) | ("en-AU", _) => Some("%d/%m/%Y"),
        (_, "en") => Some("%m/%d/%Y"),
        (_, "kk") | (_, "ru") | (_, "de") | (_, "uk") => Some("%d.%m.%Y"),
        (_, "fr") | (_, "es") | (_, "it") => Some("%d/%m/%Y"),
        (_, "tr") => Some("%d.%m.%Y"),
        _ => None,
    }
}

fn time_pattern(clock: ClockFormat) -> &'static str {
    match clock {
        ClockFormat::H24 => "%H:%M:%S",
        ClockFormat::H12 => "%I:%M:%S %p",
    }
}

/// Render `iso` as `<date>, <time>` for the configured locale and clock.
///
/// Unknown locales fall back to the default locale; unparseable input
/// renders as [`INVALID_DATE`].
pub fn format_timestamp(iso: &str, settings: &DisplaySettings) -> String {
    let Some(dt) = parse_instant(iso) else {
        log::debug!("TIMESTAMP_INVALID value={:?}", iso);
        return INVALID_DATE.to_string();
    };

    let date = date_pattern(&settings.language)
        .or_else(|| date_pattern(DEFAULT_LANGUAGE))
        .unwrap_or("%Y-%m-%d");

    format!(
        "{}, {}",
        dt.format(date),
        dt.format(time_pattern(settings.time_format))
    )
}
