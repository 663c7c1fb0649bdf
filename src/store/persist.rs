//! Local persistence of a store as a JSON array.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::error::Result;
use crate::logging::structured::LogContext;
use crate::record::Record;

use super::record_store::RecordStore;

/// Write all records to `path`, insertion order. The file is replaced
/// atomically; a failed write leaves the previous contents in place.
pub fn save_json<R: Record>(store: &RecordStore<R>, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(store.list())?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    log::info!(
        "{} STORE_SAVED path={} records={}",
        store.context(),
        path.display(),
        store.len()
    );
    Ok(())
}

/// Load records from `path`. A missing file yields an empty store.
pub fn load_json<R: Record + DeserializeOwned>(
    path: &Path,
    ctx: LogContext,
) -> Result<RecordStore<R>> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("{} STORE_LOAD_EMPTY path={}", ctx, path.display());
            return Ok(RecordStore::new(ctx));
        }
        Err(e) => return Err(e.into()),
    };

    let records: Vec<R> = serde_json::from_str(&json)?;
    log::info!(
        "{} STORE_LOADED path={} records={}",
        ctx,
        path.display(),
        records.len()
    );
    RecordStore::from_records(records, ctx)
}
