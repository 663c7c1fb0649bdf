//! KPI aggregation.

use std::collections::BTreeMap;

use crate::record::Record;

/// Count records per category.
///
/// Every key starts at zero; records whose category is not one of `keys`
/// are ignored. Callers pass the unfiltered store so that KPIs never move
/// with the filter state.
pub fn count<R: Record>(records: &[R], keys: &[&str]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = keys.iter().map(|k| (k.to_string(), 0)).collect();

    for record in records {
        if let Some(bucket) = counts.get_mut(record.category()) {
            *bucket += 1;
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EventAction, HistoryEvent, RecordId, EXPORT_CSV, UPLOAD_CSV};
    use serde_json::Map;

    fn event(action: EventAction) -> HistoryEvent {
        HistoryEvent::new("2024-01-05T10:00:00Z", action)
    }

    #[test]
    fn test_empty_input_initialises_every_key() {
        let counts = count::<HistoryEvent>(&[], &["A", "B"]);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts["A"], 0);
        assert_eq!(counts["B"], 0);
    }

    #[test]
    fn test_unknown_categories_ignored() {
        let records = vec![
            event(EventAction::UploadCsv(Map::new())),
            event(EventAction::UploadCsv(Map::new())),
            event(EventAction::ExportCsv { count: 4 }),
            event(EventAction::AddRecord { id: RecordId(1) }),
        ];

        let counts = count(&records, &[UPLOAD_CSV, EXPORT_CSV]);
        assert_eq!(counts[UPLOAD_CSV], 2);
        assert_eq!(counts[EXPORT_CSV], 1);
        assert_eq!(counts.values().sum::<usize>(), 3);
    }
}
