//! Filter / aggregate / export throughput over a synthetic history log.

use chrono::{TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Map};

use dashlog_core::export::{history_columns, CsvExporter};
use dashlog_core::query::{aggregate, filter, FilterSpec};
use dashlog_core::record::{EventAction, HistoryEvent, HISTORY_KPI_KEYS};
use dashlog_core::{LogContext, RecordStore};

fn build_store(n: usize) -> RecordStore<HistoryEvent> {
    let mut store = RecordStore::new(LogContext::new("bench"));
    for i in 0..n {
        let ts = format!("2024-{:02}-{:02}T10:00:00.000Z", i % 12 + 1, i % 28 + 1);
        let action = match i % 4 {
            0 => {
                let mut state = Map::new();
                state.insert("fileName".to_string(), json!(format!("batch_{}.csv", i)));
                EventAction::UploadCsv(state)
            }
            1 => EventAction::FilterCsv(Map::new()),
            2 => EventAction::ExportCsv { count: i },
            _ => EventAction::ExportPng(Map::new()),
        };
        let event = HistoryEvent::new(&ts, action).with_user("admin");
        store.add(event).ok();
    }
    store
}

fn bench_pipeline(c: &mut Criterion) {
    let store = build_store(5_000);
    let spec = FilterSpec::new(&HISTORY_KPI_KEYS)
        .with_query("batch_4")
        .with_dates(Some("2024-03-01"), Some("2024-09-30"));
    let exporter = CsvExporter::new(history_columns());
    let ctx = LogContext::new("bench");
    let now = Utc.timestamp_millis_opt(1_704_448_800_000).unwrap();

    c.bench_function("filter_5k", |b| {
        b.iter(|| filter::apply(black_box(store.list()), black_box(&spec)).len())
    });

    c.bench_function("aggregate_5k", |b| {
        b.iter(|| aggregate::count(black_box(store.list()), &HISTORY_KPI_KEYS))
    });

    c.bench_function("export_5k", |b| {
        b.iter(|| exporter.export(black_box(store.list()), "history", now, &ctx))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
