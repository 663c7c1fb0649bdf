//! Relative date window for the monitoring table.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LogError;
use crate::format::timestamp::parse_instant;
use crate::record::Record;

/// How far back the monitoring table looks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "7days")]
    Last7Days,
    #[serde(rename = "month")]
    LastMonth,
}

impl Period {
    /// Earliest instant still inside the window, `None` for [`Period::All`].
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::All => None,
            Period::Last7Days => Some(now - Duration::days(7)),
            Period::LastMonth => Some(now.checked_sub_months(Months::new(1)).unwrap_or(now)),
        }
    }

    /// Whether `record` falls inside `cutoff..=now`.
    pub fn contains<R: Record>(&self, record: &R, now: DateTime<Utc>) -> bool {
        let Some(cutoff) = self.cutoff(now) else {
            return true;
        };
        match parse_instant(record.timestamp()) {
            Some(at) => {
                let at = at.with_timezone(&Utc);
                at >= cutoff && at <= now
            }
            None => false,
        }
    }

    /// Records inside the window, original order.
    pub fn apply<'a, R: Record>(&self, records: &'a [R], now: DateTime<Utc>) -> Vec<&'a R> {
        records.iter().filter(|r| self.contains(*r, now)).collect()
    }
}

impl FromStr for Period {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Period::All),
            "7days" => Ok(Period::Last7Days),
            "month" => Ok(Period::LastMonth),
            other => Err(LogError::validation(
                "period",
                &format!("unknown period {:?}", other),
            )),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::All => "all",
            Period::Last7Days => "7days",
            Period::LastMonth => "month",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MonitoringEntry;
    use chrono::TimeZone;

    fn entry(date: &str) -> MonitoringEntry {
        MonitoringEntry {
            date: date.to_string(),
            ..MonitoringEntry::blank("EQ-1001")
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_all_keeps_everything() {
        let entries = vec![entry("2020-01-01"), entry("garbage")];
        assert_eq!(Period::All.apply(&entries, now()).len(), 2);
    }

    #[test]
    fn test_last_7_days_window() {
        let entries = vec![
            entry("2024-03-01"),
            entry("2024-03-09"),
            entry("2024-03-15"),
            entry("2024-03-16"),
        ];
        let dates: Vec<&str> = Period::Last7Days
            .apply(&entries, now())
            .iter()
            .map(|e| e.date.as_str())
            .collect();
        // 03-08 12:00 is the cutoff; 03-16 is in the future.
        assert_eq!(dates, vec!["2024-03-09", "2024-03-15"]);
    }

    #[test]
    fn test_last_month_window() {
        let entries = vec![entry("2024-02-15"), entry("2024-02-16"), entry("2024-03-01")];
        let dates: Vec<&str> = Period::LastMonth
            .apply(&entries, now())
            .iter()
            .map(|e| e.date.as_str())
            .collect();
        assert_eq!(dates, vec!["2024-02-16", "2024-03-01"]);
    }

    #[test]
    fn test_unparseable_dates_dropped() {
        let entries = vec![entry("not-a-date")];
        assert!(Period::Last7Days.apply(&entries, now()).is_empty());
    }

    #[test]
    fn test_parse_and_display() {
        for p in [Period::All, Period::Last7Days, Period::LastMonth] {
            assert_eq!(p.to_string().parse::<Period>(), Ok(p));
        }
        assert!("year".parse::<Period>().is_err());
    }
}
