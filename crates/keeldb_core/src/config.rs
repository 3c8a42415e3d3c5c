//! Store configuration.

use std::path::PathBuf;

/// Default WAL file name for memory-backed stores.
pub const DEFAULT_MEMORY_WAL: &str = "keeldb.wal";

/// Which engine backs the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// In-process map; contents are lost when the store is dropped
    /// (unless a WAL is enabled).
    Memory,
    /// File-backed JSON snapshot.
    Disk,
}

/// Configuration for opening a [`crate::Store`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Which engine backs the store.
    pub kind: StorageKind,

    /// Path to the snapshot file. Only used when `kind` is [`StorageKind::Disk`].
    pub data_path: PathBuf,

    /// Whether writes go through a write-ahead log.
    pub wal_enabled: bool,

    /// Path to the WAL file. When `None`, the path is derived from
    /// `data_path` for disk stores (`db.json` becomes `db.wal`) and falls
    /// back to [`DEFAULT_MEMORY_WAL`] for memory stores.
    pub wal_path: Option<PathBuf>,

    /// Whether every WAL append syncs to disk before returning.
    ///
    /// Disabling this forfeits the crash-recovery guarantee; it exists for
    /// tests and bulk loads.
    pub sync_on_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kind: StorageKind::Memory,
            data_path: PathBuf::from("keeldb.json"),
            wal_enabled: false,
            wal_path: None,
            sync_on_write: true,
        }
    }
}

impl Config {
    /// Configuration for an in-memory store without a WAL.
    #[must_use]
    pub fn memory() -> Self {
        Self::default()
    }

    /// Configuration for a disk-backed store at the given snapshot path.
    #[must_use]
    pub fn disk(data_path: impl Into<PathBuf>) -> Self {
        Self {
            kind: StorageKind::Disk,
            data_path: data_path.into(),
            ..Self::default()
        }
    }

    /// Enables or disables the write-ahead log.
    #[must_use]
    pub fn wal(mut self, enabled: bool) -> Self {
        self.wal_enabled = enabled;
        self
    }

    /// Sets an explicit WAL file path (implies `wal(true)`).
    #[must_use]
    pub fn wal_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.wal_enabled = true;
        self.wal_path = Some(path.into());
        self
    }

    /// Sets whether every WAL append syncs before returning.
    #[must_use]
    pub fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    /// Resolves the effective WAL path for this configuration.
    #[must_use]
    pub fn resolved_wal_path(&self) -> PathBuf {
        match &self.wal_path {
            Some(path) => path.clone(),
            None => match self.kind {
                StorageKind::Disk => self.data_path.with_extension("wal"),
                StorageKind::Memory => PathBuf::from(DEFAULT_MEMORY_WAL),
            },
        }
    }

}
