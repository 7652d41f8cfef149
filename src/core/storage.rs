use std::path::Path;
use std::sync::{Arc, Mutex};
use directories::ProjectDirs;
use redb::{Database, TableDefinition};

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::Snapshot;

/// Redb table holding the persisted calculator state
/// Key: fixed snapshot key, Value: JSON-serialized Snapshot
const SNAPSHOT_TABLE: TableDefinition<&str, &str> = TableDefinition::new("calculator_data");

const SNAPSHOT_KEY: &str = "calculator-data";

/// Storage trait for snapshot persistence
///
/// `load_snapshot` returns `Ok(None)` both when nothing was stored and when
/// the stored payload no longer decodes; callers treat either as "use
/// defaults".
pub trait Storage: Send + Sync {
    fn save_snapshot(&self, snapshot: &Snapshot) -> AppResult<()>;
    fn load_snapshot(&self) -> AppResult<Option<Snapshot>>;
    fn clear(&self) -> AppResult<()>;
}

/// Decode a stored payload, treating corrupt data as absent
fn decode_snapshot(raw: &str) -> Option<Snapshot> {
    match serde_json::from_str(raw) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!("[Storage] Stored snapshot is malformed, ignoring: {}", e);
            None
        }
    }
}

/// Redb-based storage implementation
pub struct RedbStorage {
    db: Arc<Database>,
}

impl RedbStorage {
    /// Open the database in the project data directory
    pub fn new() -> AppResult<Self> {
        let proj_dirs = ProjectDirs::from("com", "antigravity", "calculator-widgets")
            .ok_or_else(|| AppError::Io("Failed to get project directories".to_string()))?;

        let data_dir = proj_dirs.data_dir();
        std::fs::create_dir_all(data_dir)
            .map_err(|e| AppError::Io(format!("Failed to create data directory: {}", e)))?;

        Self::open(&data_dir.join("calculator.redb"))
    }

    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> AppResult<Self> {
        let db = Database::create(path)
            .map_err(|e| AppError::Storage(format!("Failed to create database: {}", e)))?;

        // Initialize table so reads never hit a missing table
        {
            let write_txn = db.begin_write()
                .map_err(|e| AppError::Storage(format!("Failed to begin write transaction: {}", e)))?;
            {
                let _table = write_txn.open_table(SNAPSHOT_TABLE)
                    .map_err(|e| AppError::Storage(format!("Failed to open table: {}", e)))?;
            }
            write_txn.commit()
                .map_err(|e| AppError::Storage(format!("Failed to commit transaction: {}", e)))?;
        }

        Ok(Self { db: Arc::new(db) })
    }

    /// Store a raw payload under the snapshot key
    fn write_raw(&self, payload: &str) -> AppResult<()> {
        let write_txn = self.db.begin_write()
            .map_err(|e| AppError::Storage(format!("Failed to begin write: {}", e)))?;
        {
            let mut table = write_txn.open_table(SNAPSHOT_TABLE)
                .map_err(|e| AppError::Storage(format!("Failed to open table: {}", e)))?;
            table.insert(SNAPSHOT_KEY, payload)
                .map_err(|e| AppError::Storage(format!("Failed to insert: {}", e)))?;
        }
        write_txn.commit()
            .map_err(|e| AppError::Storage(format!("Failed to commit: {}", e)))
    }
}

impl Storage for RedbStorage {
    fn save_snapshot(&self, snapshot: &Snapshot) -> AppResult<()> {
        let serialized = serde_json::to_string(snapshot)?;
        self.write_raw(&serialized)?;
        tracing::debug!("[RedbStorage] Saved snapshot ({} history entries)", snapshot.history.len());
        Ok(())
    }

    fn load_snapshot(&self) -> AppResult<Option<Snapshot>> {
        let read_txn = self.db.begin_read()
            .map_err(|e| AppError::Storage(format!("Failed to begin read: {}", e)))?;
        let table = read_txn.open_table(SNAPSHOT_TABLE)
            .map_err(|e| AppError::Storage(format!("Failed to open table: {}", e)))?;

        let stored = table.get(SNAPSHOT_KEY)
            .map_err(|e| AppError::Storage(format!("Failed to read snapshot: {}", e)))?;

        Ok(stored.and_then(|guard| decode_snapshot(guard.value())))
    }

    fn clear(&self) -> AppResult<()> {
        let write_txn = self.db.begin_write()
            .map_err(|e| AppError::Storage(format!("Failed to begin write: {}", e)))?;
        {
            let mut table = write_txn.open_table(SNAPSHOT_TABLE)
                .map_err(|e| AppError::Storage(format!("Failed to open table: {}", e)))?;
            table.remove(SNAPSHOT_KEY)
                .map_err(|e| AppError::Storage(format!("Failed to remove snapshot: {}", e)))?;
        }
        write_txn.commit()
            .map_err(|e| AppError::Storage(format!("Failed to commit: {}", e)))
    }
}

/// In-memory storage (fallback if the database cannot be opened, and for tests)
#[derive(Default)]
pub struct InMemoryStorage {
    payload: Mutex<Option<String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with a raw payload, as if written by an older or foreign writer
    pub fn with_raw(payload: impl Into<String>) -> Self {
        Self {
            payload: Mutex::new(Some(payload.into())),
        }
    }
}

impl Storage for InMemoryStorage {
    fn save_snapshot(&self, snapshot: &Snapshot) -> AppResult<()> {
        let serialized = serde_json::to_string(snapshot)?;
        let mut payload = self.payload.lock()
            .map_err(|e| AppError::Storage(format!("Mutex poisoned: {}", e)))?;
        *payload = Some(serialized);
        Ok(())
    }

    fn load_snapshot(&self) -> AppResult<Option<Snapshot>> {
        let payload = self.payload.lock()
            .map_err(|e| AppError::Storage(format!("Mutex poisoned: {}", e)))?;
        Ok(payload.as_deref().and_then(decode_snapshot))
    }

    fn clear(&self) -> AppResult<()> {
        let mut payload = self.payload.lock()
            .map_err(|e| AppError::Storage(format!("Mutex poisoned: {}", e)))?;
        *payload = None;
        Ok(())
    }
}

/// Open the on-disk store, falling back to memory if that fails
pub fn default_storage() -> Arc<dyn Storage> {
    match RedbStorage::new() {
        Ok(storage) => Arc::new(storage),
        Err(e) => {
            tracing::warn!("[Storage] Failed to initialize database: {}, using in-memory fallback", e);
            Arc::new(InMemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::{AngleMode, ConversionRecord, HistoryEntry, Theme};

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            memory: 42.5,
            history: vec![HistoryEntry::new("2 + 3", 5.0), HistoryEntry::new("sin(0)", 0.0)],
            conversion_history: vec![ConversionRecord::new(1.0, "km", 0.621371, "mi")],
            angle_mode: AngleMode::Gradians,
            theme: Theme::Dark,
        }
    }

    #[test]
    fn test_in_memory_round_trip() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.load_snapshot().unwrap(), None);

        let snapshot = sample_snapshot();
        storage.save_snapshot(&snapshot).unwrap();
        assert_eq!(storage.load_snapshot().unwrap(), Some(snapshot));

        storage.clear().unwrap();
        assert_eq!(storage.load_snapshot().unwrap(), None);
    }

    #[test]
    fn test_corrupt_payload_reads_as_absent() {
        let storage = InMemoryStorage::with_raw("{\"memory\": [oops");
        assert_eq!(storage.load_snapshot().unwrap(), None);
    }

    #[test]
    fn test_redb_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calculator.redb");

        let snapshot = sample_snapshot();
        {
            let storage = RedbStorage::open(&path).unwrap();
            assert_eq!(storage.load_snapshot().unwrap(), None);
            storage.save_snapshot(&snapshot).unwrap();
        }

        // Reopen to make sure the data actually hit disk
        let storage = RedbStorage::open(&path).unwrap();
        assert_eq!(storage.load_snapshot().unwrap(), Some(snapshot));

        storage.clear().unwrap();
        assert_eq!(storage.load_snapshot().unwrap(), None);
    }

    #[test]
    fn test_redb_corrupt_payload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = RedbStorage::open(&dir.path().join("calculator.redb")).unwrap();
        storage.write_raw("not json at all").unwrap();
        assert_eq!(storage.load_snapshot().unwrap(), None);
    }
}
