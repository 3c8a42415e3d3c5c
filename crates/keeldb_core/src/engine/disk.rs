//! Disk-backed storage engine with whole-file JSON snapshots.

use crate::engine::{validate_key, Engine};
use crate::error::{CoreError, CoreResult};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk snapshot document: `{"data": {<key>: <base64 value>, ...}}`.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    data: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct State {
    closed: bool,
    entries: HashMap<String, Vec<u8>>,
}

impl State {
    fn ensure_open(&self) -> CoreResult<()> {
        if self.closed {
            return Err(CoreError::StorageClosed);
        }
        Ok(())
    }
}

/// A file-backed key/value engine.
///
/// The full mapping is held in memory; the snapshot file is rewritten on
/// every mutation and on close, so a reader of the file observes either
/// the old snapshot or the new one, never a partial write. The save path
/// writes a sibling `.tmp` file, syncs it, renames it over the target,
/// and syncs the parent directory.
///
/// Whole-snapshot persistence is deliberately simple; fine-grained
/// durability between snapshots is the write-ahead log's job
/// (see [`crate::WalStore`]).
#[derive(Debug)]
pub struct DiskEngine {
    path: PathBuf,
    state: RwLock<State>,
}

impl DiskEngine {
    /// Opens the engine, loading an existing snapshot if one is present.
    ///
    /// A missing or empty file yields an empty engine.
    ///
    /// # Errors
    ///
    /// Returns `Corruption` if the snapshot file exists but cannot be
    /// decoded.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let entries = Self::load(&path)?;
        debug!(path = %path.display(), entries = entries.len(), "opened disk engine");

        Ok(Self {
            path,
            state: RwLock::new(State {
                closed: false,
                entries,
            }),
        })
    }

    fn load(path: &Path) -> CoreResult<HashMap<String, Vec<u8>>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }

        let raw = fs::read(path)?;
        if raw.is_empty() {
            return Ok(HashMap::new());
        }

        let snapshot: Snapshot = serde_json::from_slice(&raw)
            .map_err(|e| CoreError::corruption(format!("corrupted data file: {e}")))?;

        let mut entries = HashMap::with_capacity(snapshot.data.len());
        for (key, encoded) in snapshot.data {
            let value = BASE64.decode(&encoded).map_err(|e| {
                CoreError::corruption(format!("corrupted data file: bad value for {key:?}: {e}"))
            })?;
            entries.insert(key, value);
        }
        Ok(entries)
    }

    /// Writes the full snapshot atomically: sibling `.tmp`, fsync, rename
    /// over the target, fsync the parent directory.
    fn save(&self, entries: &HashMap<String, Vec<u8>>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = entries
            .iter()
            .map(|(k, v)| (k.clone(), BASE64.encode(v)))
            .collect();
        let encoded = serde_json::to_vec(&Snapshot { data })
            .map_err(|e| CoreError::corruption(format!("snapshot encode failed: {e}")))?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(&encoded)?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                File::open(parent)?.sync_all()?;
            }
        }

        Ok(())
    }
}

impl Engine for DiskEngine {
    fn get(&self, key: &str) -> CoreResult<Vec<u8>> {
        let state = self.state.read();
        state.ensure_open()?;
        validate_key(key)?;

        state
            .entries
            .get(key)
            .cloned()
            .ok_or(CoreError::KeyNotFound)
    }

    fn put(&self, key: &str, value: &[u8]) -> CoreResult<()> {
        let mut state = self.state.write();
        state.ensure_open()?;
        validate_key(key)?;

        state.entries.insert(key.to_string(), value.to_vec());
        self.save(&state.entries)
    }

    fn delete(&self, key: &str) -> CoreResult<()> {
        let mut state = self.state.write();
        state.ensure_open()?;
        validate_key(key)?;

        if state.entries.remove(key).is_none() {
            return Err(CoreError::KeyNotFound);
        }
        self.save(&state.entries)
    }

    fn exists(&self, key: &str) -> CoreResult<bool> {
        let state = self.state.read();
        state.ensure_open()?;
        validate_key(key)?;

        Ok(state.entries.contains_key(key))
    }

    fn keys(&self) -> CoreResult<Vec<String>> {
        let state = self.state.read();
        state.ensure_open()?;

        Ok(state.entries.keys().cloned().collect())
    }

    fn close(&self) -> CoreResult<()> {
        let mut state = self.state.write();
        if state.closed {
            return Ok(());
        }
        self.save(&state.entries)?;
        state.closed = true;
        debug!(path = %self.path.display(), "closed disk engine");
        Ok(())
    }
}
