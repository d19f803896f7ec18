//! Append-only history of scoring results
//!
//! Every scoring call can be recorded as an immutable [`HistoryRecord`].
//! Records are never updated or deleted; reads return the most recent ones
//! for trend display. The scorer itself never reads history.

mod redb_store;

pub use redb_store::RedbHistory;

use crate::models::{ComplianceResult, HistoryRecord, Trend};
use std::sync::Mutex;
use thiserror::Error;

/// Number of records shown when no limit is given
pub const DEFAULT_RECENT_LIMIT: usize = 10;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("failed to open history database: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("history transaction failed: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("history table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("history storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("failed to commit history record: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("failed to encode history record: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history store lock poisoned")]
    Poisoned,
}

/// Append-only log of compliance results.
///
/// Implementations must serialize concurrent appends; ids are assigned in
/// insertion order starting at 1.
pub trait HistoryStore: Send + Sync {
    /// Persist a snapshot of `result`, returning the stored record
    fn record(&self, result: &ComplianceResult) -> Result<HistoryRecord, HistoryError>;

    /// Up to `limit` most recent records, newest first
    fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError>;

    /// The last `limit` records as a chronological series
    fn trend(&self, limit: usize) -> Result<Trend, HistoryError> {
        Ok(Trend::from_records(&self.recent(limit)?))
    }
}

/// In-process history, lost on exit. Used when persistence is disabled and in tests.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistory {
    fn record(&self, result: &ComplianceResult) -> Result<HistoryRecord, HistoryError> {
        let mut records = self.records.lock().map_err(|_| HistoryError::Poisoned)?;
        let record = HistoryRecord::from_result(records.len() as u64 + 1, result);
        records.push(record.clone());
        Ok(record)
    }

    fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
        let records = self.records.lock().map_err(|_| HistoryError::Poisoned)?;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}
