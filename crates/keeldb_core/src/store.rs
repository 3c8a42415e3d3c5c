//! Store facade: engine + transactions + indexes behind one handle.

use crate::config::{Config, StorageKind};
use crate::engine::{DiskEngine, Engine, MemoryEngine};
use crate::error::{CoreError, CoreResult};
use crate::index::IndexManager;
use crate::transaction::{Transaction, TransactionManager};
use crate::walstore::WalStore;
use std::path::Path;
use tracing::info;

enum Backend {
    Plain(Box<dyn Engine>),
    Wal(WalStore),
}

impl Backend {
    fn engine(&self) -> &dyn Engine {
        match self {
            Self::Plain(engine) => engine.as_ref(),
            Self::Wal(store) => store,
        }
    }
}

/// The main store handle.
///
/// Bundles an engine (optionally WAL-wrapped), a transaction manager, and
/// an index manager. Built from a [`Config`]:
///
/// ```rust
/// use keeldb_core::{Config, Store};
///
/// let store = Store::open(Config::memory()).unwrap();
/// store.put("user:1", b"John Doe").unwrap();
/// assert_eq!(store.get("user:1").unwrap(), b"John Doe");
/// ```
///
/// Direct reads and writes go straight to the engine (through the WAL for
/// writes when one is configured). Transactions stage locally and are
/// promoted on [`Store::commit_transaction`].
pub struct Store {
    backend: Backend,
    transactions: TransactionManager,
    indexes: IndexManager,
}

impl Store {
    /// Opens a store as described by `config`.
    ///
    /// When a WAL is configured, any existing log is replayed into the
    /// engine before this returns.
    ///
    /// # Errors
    ///
    /// Returns `Corruption` for an undecodable snapshot or WAL, or an I/O
    /// error from opening the underlying files.
    pub fn open(config: Config) -> CoreResult<Self> {
        let engine: Box<dyn Engine> = match config.kind {
            StorageKind::Memory => Box::new(MemoryEngine::new()),
            StorageKind::Disk => Box::new(DiskEngine::open(&config.data_path)?),
        };

        let backend = if config.wal_enabled {
            let wal_path = config.resolved_wal_path();
            Backend::Wal(WalStore::open(engine, wal_path, config.sync_on_write)?)
        } else {
            Backend::Plain(engine)
        };

        info!(
            kind = ?config.kind,
            wal = config.wal_enabled,
            "store opened"
        );

        Ok(Self {
            backend,
            transactions: TransactionManager::new(),
            indexes: IndexManager::new(),
        })
    }

    /// Opens an in-memory store without a WAL. Shorthand for tests and
    /// ephemeral use.
    pub fn memory() -> CoreResult<Self> {
        Self::open(Config::memory())
    }

    /// Retrieves a value by key.
    pub fn get(&self, key: &str) -> CoreResult<Vec<u8>> {
        self.backend.engine().get(key)
    }

    /// Stores a key/value pair.
    pub fn put(&self, key: &str, value: &[u8]) -> CoreResult<()> {
        self.backend.engine().put(key, value)
    }

    /// Removes a key.
    pub fn delete(&self, key: &str) -> CoreResult<()> {
        self.backend.engine().delete(key)
    }

    /// Checks whether a key exists.
    pub fn exists(&self, key: &str) -> CoreResult<bool> {
        self.backend.engine().exists(key)
    }

    /// Returns all keys, unordered.
    pub fn keys(&self) -> CoreResult<Vec<String>> {
        self.backend.engine().keys()
    }

    /// Closes the store. Idempotent.
    pub fn close(&self) -> CoreResult<()> {
        self.backend.engine().close()
    }

    /// Begins a new transaction.
    pub fn begin_transaction(&self) -> Transaction {
        self.transactions.begin()
    }

    /// Commits a transaction: stages are logged (when a WAL is present)
    /// and applied to the engine, then the transaction is marked
    /// committed and dropped from the active set.
    ///
    /// Tombstones for keys the engine never held are skipped.
    pub fn commit_transaction(&self, txn: &Transaction) -> CoreResult<()> {
        let (writes, deletes) = txn.staged_sets()?;

        match &self.backend {
            Backend::Wal(store) => store.commit(&writes, &deletes)?,
            Backend::Plain(engine) => {
                for (key, value) in &writes {
                    engine.put(key, value)?;
                }
                for key in &deletes {
                    match engine.delete(key) {
                        Ok(()) => {}
                        Err(CoreError::KeyNotFound) => {}
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        self.transactions.commit(txn)
    }

    /// Aborts a transaction, discarding its stages. No WAL activity.
    pub fn abort_transaction(&self, txn: &Transaction) -> CoreResult<()> {
        self.transactions.abort(txn)
    }

    /// Returns the index manager.
    #[must_use]
    pub fn index_manager(&self) -> &IndexManager {
        &self.indexes
    }

    /// Truncates the WAL to zero length.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if the store was opened without a WAL.
    pub fn checkpoint(&self) -> CoreResult<()> {
        match &self.backend {
            Backend::Wal(store) => store.checkpoint(),
            Backend::Plain(_) => Err(CoreError::invalid_operation(
                "write-ahead log is not enabled",
            )),
        }
    }

    /// Replays the current WAL into the engine. Returns the number of
    /// records applied.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if the store was opened without a WAL.
    pub fn recover(&self) -> CoreResult<usize> {
        match &self.backend {
            Backend::Wal(store) => store.recover(),
            Backend::Plain(_) => Err(CoreError::invalid_operation(
                "write-ahead log is not enabled",
            )),
        }
    }

    /// Returns the WAL file path, if a WAL is configured.
    #[must_use]
    pub fn wal_path(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Wal(store) => Some(store.wal_path()),
            Backend::Plain(_) => None,
        }
    }

    /// Returns the current WAL size in bytes.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if the store was opened without a WAL.
    pub fn wal_size(&self) -> CoreResult<u64> {
        match &self.backend {
            Backend::Wal(store) => store.wal_size(),
            Backend::Plain(_) => Err(CoreError::invalid_operation(
                "write-ahead log is not enabled",
            )),
        }
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("wal", &self.wal_path())
            .finish_non_exhaustive()
    }
}
