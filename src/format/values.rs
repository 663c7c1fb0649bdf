//! Unit-suffixed rendering of monitoring metrics.

use lazy_static::lazy_static;
use regex::Regex;

use crate::record::MetricField;

lazy_static! {
    /// Leading decimal number, as read by a lenient float parse.
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^\s*[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").unwrap();
}

/// Parse the numeric prefix of `raw` (`"12.5abc"` -> 12.5).
pub fn parse_leading_number(raw: &str) -> Option<f64> {
    if let Some(m) = LEADING_NUMBER.find(raw) {
        return m.as_str().trim().parse().ok();
    }
    match raw.trim_start() {
        s if s.starts_with("Infinity") || s.starts_with("+Infinity") => Some(f64::INFINITY),
        s if s.starts_with("-Infinity") => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

/// Display form of a metric value. Non-numeric input passes through as-is.
pub fn format_metric(field: MetricField, raw: &str) -> String {
    let Some(n) = parse_leading_number(raw) else {
        return raw.to_string();
    };

    match field {
        MetricField::PowerNow => format!("{:.0} W", n),
        MetricField::EnergyDay => format!("{:.2} кВт·сағ", n),
        MetricField::Hashrate => format!("{:.2} TH/s", n),
        MetricField::Efficiency => format!("{:.2} TH/kWh", n),
        MetricField::Uptime => format!("{} сағ", n),
        MetricField::ActivePct => format!("{}%", n),
        _ => raw.to_string(),
    }
}

/// Display form of any monitoring column by wire name.
pub fn format_column(key: &str, raw: &str) -> String {
    match MetricField::from_key(key) {
        Some(field) => format_metric(field, raw),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_number_parse() {
        assert_eq!(parse_leading_number("42"), Some(42.0));
        assert_eq!(parse_leading_number(" 12.5abc"), Some(12.5));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("1e3"), Some(1000.0));
        assert_eq!(parse_leading_number("abc"), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn test_unit_suffixes() {
        assert_eq!(format_metric(MetricField::PowerNow, "3250.4"), "3250 W");
        assert_eq!(format_metric(MetricField::EnergyDay, "78"), "78.00 кВт·сағ");
        assert_eq!(format_metric(MetricField::Hashrate, "110.456"), "110.46 TH/s");
        assert_eq!(format_metric(MetricField::Efficiency, "33.9"), "33.90 TH/kWh");
        assert_eq!(format_metric(MetricField::Uptime, "24"), "24 сағ");
        assert_eq!(format_metric(MetricField::Uptime, "23.5"), "23.5 сағ");
        assert_eq!(format_metric(MetricField::ActivePct, "99"), "99%");
    }

    #[test]
    fn test_unsuffixed_and_non_numeric_pass_through() {
        assert_eq!(format_metric(MetricField::Asic, "71.0"), "71.0");
        assert_eq!(format_metric(MetricField::PowerNow, "n/a"), "n/a");
        assert_eq!(format_column("eq", "EQ-1001"), "EQ-1001");
        assert_eq!(format_column("hashrate", "100"), "100.00 TH/s");
    }
}
