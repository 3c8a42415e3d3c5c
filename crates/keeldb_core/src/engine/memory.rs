//! In-memory storage engine.

use crate::engine::{validate_key, Engine};
use crate::error::{CoreError, CoreResult};
use parking_lot::RwLock;
use std::collections::HashMap;

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

/// An in-process key/value engine.
///
/// Backed by a map behind a reader/writer lock: reads share, writes
/// exclude. Contents are lost when the engine is dropped.
///
/// # Example
///
/// ```rust
/// use keeldb_core::{Engine, MemoryEngine};
///
/// let engine = MemoryEngine::new();
/// engine.put("user:1", b"John Doe").unwrap();
/// assert_eq!(engine.get("user:1").unwrap(), b"John Doe");
/// ```
#[derive(Debug, Default)]
pub struct MemoryEngine {
    state: RwLock<State>,
}

impl MemoryEngine {
    /// Creates a new empty in-memory engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Engine for MemoryEngine {
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
        Ok(())
    }

    fn delete(&self, key: &str) -> CoreResult<()> {
        let mut state = self.state.write();
        state.ensure_open()?;
        validate_key(key)?;

        state
            .entries
            .remove(key)
            .map(|_| ())
            .ok_or(CoreError::KeyNotFound)
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
        state.closed = true;
        state.entries.clear();
        Ok(())
    }
}
