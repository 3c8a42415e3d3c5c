//! WAL append path and replay.

use crate::engine::Engine;
use crate::error::{CoreError, CoreResult};
use crate::wal::reader::WalReader;
use crate::wal::record::LogRecord;
use keeldb_storage::StorageBackend;
use parking_lot::Mutex;
use tracing::debug;

/// Manages WAL appends and reads.
///
/// Appends are serialized under a mutex, so concurrent appenders observe a
/// total order; the order is observable via replay. Every successful
/// append is flushed (and, with `sync_on_write`, fsynced) before the call
/// returns.
pub struct WalManager {
    backend: Mutex<Box<dyn StorageBackend>>,
    sync_on_write: bool,
}

impl WalManager {
    /// Creates a new WAL manager over the given backend.
    pub fn new(backend: Box<dyn StorageBackend>, sync_on_write: bool) -> Self {
        Self {
            backend: Mutex::new(backend),
            sync_on_write,
        }
    }

    /// Appends a record and makes it durable.
    ///
    /// Returns the offset where the record's frame was written. If this
    /// returns an error the log is considered not to contain the record.
    pub fn append(&self, record: &LogRecord) -> CoreResult<u64> {
        let payload = record.encode()?;
        let len = u32::try_from(payload.len())
            .map_err(|_| CoreError::invalid_operation("WAL record payload too large"))?;

        let mut frame = Vec::with_capacity(4 + payload.len());
        frame.extend_from_slice(&len.to_le_bytes());
        frame.extend_from_slice(&payload);

        let mut backend = self.backend.lock();
        let offset = backend.append(&frame)?;
        backend.flush()?;
        if self.sync_on_write {
            backend.sync()?;
        }

        Ok(offset)
    }

    /// Returns the current WAL size in bytes.
    pub fn size(&self) -> CoreResult<u64> {
        Ok(self.backend.lock().size()?)
    }

    /// Returns a streaming iterator over the log's records.
    ///
    /// The iterator holds the append lock: no records can be written while
    /// it is alive.
    pub fn iter(&self) -> CoreResult<WalReader<'_>> {
        WalReader::new(self.backend.lock())
    }

    /// Replays the log into `engine` from offset zero.
    ///
    /// Every intact Put/Delete record is applied; Commit markers are
    /// ignored. A Delete whose key is absent from the engine is skipped so
    /// replay stays idempotent. Returns the number of records applied.
    ///
    /// # Errors
    ///
    /// Returns `Corruption` if a record fails its checksum or cannot be
    /// decoded.
    pub fn replay_into(&self, engine: &dyn Engine) -> CoreResult<usize> {
        let mut applied = 0usize;
        for result in self.iter()? {
            let (_, record) = result?;
            match record {
                LogRecord::Put { key, value, .. } => {
                    engine.put(&key, &value)?;
                    applied += 1;
                }
                LogRecord::Delete { key, .. } => {
                    match engine.delete(&key) {
                        Ok(()) => {}
                        Err(CoreError::KeyNotFound) => {}
                        Err(e) => return Err(e),
                    }
                    applied += 1;
                }
                LogRecord::Commit { .. } => {}
            }
        }
        debug!(applied, "WAL replay complete");
        Ok(applied)
    }

    /// Truncates the log to zero length (checkpoint).
    ///
    /// The caller is responsible for ensuring the engine has absorbed
    /// every logged effect first.
    pub fn truncate(&self) -> CoreResult<()> {
        let mut backend = self.backend.lock();
        backend.truncate(0)?;
        debug!("WAL truncated");
        Ok(())
    }
}

impl std::fmt::Debug for WalManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalManager")
            .field("sync_on_write", &self.sync_on_write)
            .finish_non_exhaustive()
    }
}
