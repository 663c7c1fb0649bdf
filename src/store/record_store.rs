//! Ordered record collection with unique, never-reused ids.

use crate::error::{LogError, Result};
use crate::logging::structured::LogContext;
use crate::record::{Record, RecordId};

/// In-memory log of records in insertion order.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    records: Vec<R>,
    /// Next id handed out; only ever grows.
    next_id: u64,
    ctx: LogContext,
}

/// Counter value following `id`; the largest `u64` is never issued.
fn successor(id: RecordId) -> Result<u64> {
    id.0.checked_add(1)
        .ok_or_else(|| LogError::validation("id", &format!("id {} is out of range", id)))
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new(LogContext::generate())
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new(ctx: LogContext) -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            ctx,
        }
    }

    /// Build a store from previously saved records, keeping their ids.
    ///
    /// Records without an id are numbered after the largest explicit id in
    /// the input, wherever they appear.
    pub fn from_records(records: Vec<R>, ctx: LogContext) -> Result<Self> {
        let mut store = Self::new(ctx);
        if let Some(max) = records
            .iter()
            .map(|r| r.id())
            .filter(|id| id.is_assigned())
            .max()
        {
            store.next_id = successor(max)?;
        }
        for record in records {
            store.add(record)?;
        }
        Ok(store)
    }

    pub fn context(&self) -> &LogContext {
        &self.ctx
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records, insertion order.
    pub fn list(&self) -> &[R] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Append a record, assigning an id when it has none.
    ///
    /// Explicit ids must not collide with a stored record; they also move
    /// the id counter forward so a freed id is never handed out again.
    pub fn add(&mut self, mut record: R) -> Result<R> {
        if let Err(e) = record.validate() {
            log::warn!("{} RECORD_ADD_REJECTED error={}", self.ctx, e);
            return Err(e);
        }

        if record.id().is_assigned() {
            let id = record.id();
            if self.contains(id) {
                log::warn!("{} RECORD_ADD_REJECTED duplicate_id={}", self.ctx, id);
                return Err(LogError::DuplicateId { id });
            }
            self.next_id = self.next_id.max(successor(id)?);
        } else {
            let id = RecordId(self.next_id);
            self.next_id = successor(id)?;
            record.set_id(id);
        }

        log::info!(
            "{} RECORD_ADDED id={} category={} total={}",
            self.ctx,
            record.id(),
            record.category(),
            self.records.len() + 1
        );

        self.records.push(record.clone());
        Ok(record)
    }

    /// Replace the record with the same id wholesale.
    pub fn update(&mut self, record: R) -> Result<()> {
        record.validate()?;

        let id = record.id();
        let Some(index) = self.position(id) else {
            log::warn!("{} RECORD_UPDATE_REJECTED id={} found=false", self.ctx, id);
            return Err(LogError::NotFound { id });
        };

        log::info!("{} RECORD_UPDATED id={} position={}", self.ctx, id, index);
        self.records[index] = record;
        Ok(())
    }

    /// Remove the record with `id`. Returns whether anything was removed;
    /// an unknown id is not an error.
    pub fn delete(&mut self, id: RecordId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.records.remove(index);
                log::info!(
                    "{} RECORD_DELETED id={} remaining={}",
                    self.ctx,
                    id,
                    self.records.len()
                );
                true
            }
            None => {
                log::debug!("{} RECORD_DELETE_NOOP id={}", self.ctx, id);
                false
            }
        }
    }

    /// Drop every record. The id counter is kept.
    pub fn clear(&mut self) {
        let dropped = self.records.len();
        self.records.clear();
        log::info!("{} STORE_CLEARED dropped={}", self.ctx, dropped);
    }
}
