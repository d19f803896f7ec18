//! File-backed history using redb

use super::{HistoryError, HistoryStore};
use crate::models::{ComplianceResult, HistoryRecord};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::debug;

// id -> JSON-encoded HistoryRecord
const HISTORY_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("compliance_history");

/// History log in a single redb file.
///
/// redb allows one write transaction at a time, so appends from parallel
/// scoring calls serialize and ids stay unique.
pub struct RedbHistory {
    db: Database,
    path: PathBuf,
}

impl RedbHistory {
    /// Open or create the database, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        debug!("Opened history database at {}", path.display());
        Ok(Self {
            db,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for RedbHistory {
    fn record(&self, result: &ComplianceResult) -> Result<HistoryRecord, HistoryError> {
        let write_txn = self.db.begin_write()?;
        let record = {
            let mut table = write_txn.open_table(HISTORY_TABLE)?;
            let id = table.last()?.map(|(key, _)| key.value() + 1).unwrap_or(1);
            let record = HistoryRecord::from_result(id, result);
            let value = serde_json::to_vec(&record)?;
            table.insert(id, value.as_slice())?;
            record
        };
        write_txn.commit()?;

        debug!("Recorded history entry {}", record.id);
        Ok(record)
    }

    fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>, HistoryError> {
        let read_txn = self.db.begin_read()?;

        // Nothing recorded yet
        let table = match read_txn.open_table(HISTORY_TABLE) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::with_capacity(limit.min(64));
        for item in table.range::<u64>(..)?.rev().take(limit) {
            let (_, value) = item?;
            records.push(serde_json::from_slice(value.value())?);
        }
        Ok(records)
    }
}
