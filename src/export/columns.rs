//! Column sets for the two dashboard downloads.

use crate::record::{HistoryEvent, MetricField, MonitoringEntry};

use super::csv::Column;

pub const HISTORY_EXPORT_PREFIX: &str = "history";
pub const MONITORING_EXPORT_PREFIX: &str = "monitoring";

/// Time, user, action, params (JSON), file.
pub fn history_columns() -> Vec<Column<HistoryEvent>> {
    vec![
        Column::new("Уақыты", |e: &HistoryEvent| Ok(e.timestamp.clone())),
        Column::new("Пайдаланушы", |e: &HistoryEvent| {
            Ok(e.user.clone().unwrap_or_default())
        }),
        Column::new("Іс-әрекет", |e: &HistoryEvent| {
            Ok(e.action.kind().to_string())
        }),
        Column::new("Параметрлер", |e: &HistoryEvent| {
            Ok(serde_json::to_string(&e.action.params())?)
        }),
        Column::new("Файл", |e: &HistoryEvent| {
            Ok(e.file.clone().unwrap_or_default())
        }),
    ]
}

/// Equipment, date, then every metric in form order.
pub fn monitoring_columns() -> Vec<Column<MonitoringEntry>> {
    let mut columns = vec![
        Column::new("Жабдық", |e: &MonitoringEntry| Ok(e.eq.clone())),
        Column::new("Күні", |e: &MonitoringEntry| Ok(e.date.clone())),
    ];
    columns.extend(MetricField::ALL.iter().map(|&field| {
        Column::new(field.label(), move |e: &MonitoringEntry| {
            Ok(e.metric(field).to_string())
        })
    }));
    columns
}
