//! WAL-wrapped storage: log-then-apply durability over an engine.

use crate::engine::{validate_key, Engine};
use crate::error::{CoreError, CoreResult};
use crate::wal::{LogRecord, WalManager};
use keeldb_storage::FileBackend;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// An engine wrapper that sequences every write through a write-ahead log.
///
/// `WalStore` implements [`Engine`] itself, so callers stay unaware of
/// whether they hold a bare engine or a logged one.
///
/// # Ordering invariant
///
/// A successful return from `put`/`delete` means the effect is in the log
/// **and** in the engine, in that order. If the append fails the engine is
/// untouched. A crash after the append but before the apply is repaired by
/// replay at the next open.
///
/// # Open-time contract
///
/// Construction replays any existing log into the engine before the value
/// is returned, so previously-logged-but-not-snapshotted effects are
/// reinstated before callers can observe the store.
pub struct WalStore {
    engine: Box<dyn Engine>,
    wal: WalManager,
    wal_path: PathBuf,
    /// Serializes transaction commits so their record sequences do not
    /// interleave in the log.
    commit_lock: Mutex<()>,
}

impl WalStore {
    /// Opens a WAL at `wal_path` (creating parent directories as needed),
    /// replays it into `engine`, and returns the wrapped store.
    ///
    /// # Errors
    ///
    /// Returns `Corruption` if the existing log fails checksum
    /// verification during replay.
    pub fn open(
        engine: Box<dyn Engine>,
        wal_path: impl Into<PathBuf>,
        sync_on_write: bool,
    ) -> CoreResult<Self> {
        let wal_path = wal_path.into();
        let backend = FileBackend::open_with_create_dirs(&wal_path)?;
        let wal = WalManager::new(Box::new(backend), sync_on_write);

        let applied = wal.replay_into(engine.as_ref())?;
        if applied > 0 {
            info!(path = %wal_path.display(), applied, "replayed WAL into engine");
        }

        Ok(Self {
            engine,
            wal,
            wal_path,
            commit_lock: Mutex::new(()),
        })
    }

    /// Returns the WAL file path.
    #[must_use]
    pub fn wal_path(&self) -> &Path {
        &self.wal_path
    }

    /// Returns the current WAL size in bytes.
    pub fn wal_size(&self) -> CoreResult<u64> {
        self.wal.size()
    }

    /// Truncates the WAL to zero length.
    ///
    /// Safe because every logged effect has already been applied to the
    /// engine before the logging call returned; for the disk engine each
    /// apply also snapshots.
    pub fn checkpoint(&self) -> CoreResult<()> {
        let _guard = self.commit_lock.lock();
        self.wal.truncate()?;
        debug!("checkpoint complete");
        Ok(())
    }

    /// Replays the current WAL into the engine.
    ///
    /// Idempotent: re-applying Puts overwrites with the same values and
    /// re-applying Deletes of absent keys is skipped.
    pub fn recover(&self) -> CoreResult<usize> {
        self.wal.replay_into(self.engine.as_ref())
    }

    /// Commits a transaction's staged sets: logs one Put record per staged
    /// write and one Delete record per tombstone, then a Commit marker,
    /// then applies the sets to the engine.
    ///
    /// If an append fails before the Commit marker, the engine is
    /// untouched. Records already appended will be re-applied by the next
    /// replay; the durability unit is the single record, not the
    /// transaction.
    pub fn commit(
        &self,
        writes: &HashMap<String, Vec<u8>>,
        deletes: &HashSet<String>,
    ) -> CoreResult<()> {
        let _guard = self.commit_lock.lock();

        for (key, value) in writes {
            self.wal.append(&LogRecord::put(key.clone(), value.clone()))?;
        }
        for key in deletes {
            self.wal.append(&LogRecord::delete(key.clone()))?;
        }
        self.wal.append(&LogRecord::commit())?;

        for (key, value) in writes {
            self.engine.put(key, value)?;
        }
        for key in deletes {
            match self.engine.delete(key) {
                Ok(()) => {}
                Err(CoreError::KeyNotFound) => {}
                Err(e) => return Err(e),
            }
        }

        debug!(
            puts = writes.len(),
            deletes = deletes.len(),
            "transaction applied"
        );
        Ok(())
    }
}

impl Engine for WalStore {
    fn get(&self, key: &str) -> CoreResult<Vec<u8>> {
        self.engine.get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> CoreResult<()> {
        validate_key(key)?;
        self.wal.append(&LogRecord::put(key, value.to_vec()))?;
        self.engine.put(key, value)
    }

    fn delete(&self, key: &str) -> CoreResult<()> {
        validate_key(key)?;
        self.wal.append(&LogRecord::delete(key))?;
        self.engine.delete(key)
    }

    fn exists(&self, key: &str) -> CoreResult<bool> {
        self.engine.exists(key)
    }

    fn keys(&self) -> CoreResult<Vec<String>> {
        self.engine.keys()
    }

    fn close(&self) -> CoreResult<()> {
        self.engine.close()
    }
}

impl std::fmt::Debug for WalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalStore")
            .field("wal_path", &self.wal_path)
            .finish_non_exhaustive()
    }
}
