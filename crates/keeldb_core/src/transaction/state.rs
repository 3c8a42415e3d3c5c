//! Transaction state and staging sets.

use crate::engine::validate_key;
use crate::error::{CoreError, CoreResult};
use crate::types::{unix_nanos, TransactionId};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// State of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// The transaction can stage operations and be committed or aborted.
    Active,
    /// The transaction has been committed.
    Committed,
    /// The transaction has been aborted.
    Aborted,
}

#[derive(Debug)]
struct TxState {
    state: TransactionState,
    read_set: HashMap<String, Vec<u8>>,
    write_set: HashMap<String, Vec<u8>>,
    deleted: HashSet<String>,
}

impl TxState {
    fn ensure_active(&self) -> CoreResult<()> {
        match self.state {
            TransactionState::Active => Ok(()),
            TransactionState::Aborted => Err(CoreError::TransactionAborted),
            TransactionState::Committed => Err(CoreError::TransactionAlreadyCommitted),
        }
    }
}

/// A transaction handle.
///
/// The handle is cheap to clone and internally synchronized, so an owner
/// may use it from several threads - though doing so concurrently with
/// commit is a caller error.
///
/// A transaction is a **pure staging buffer**: `get` sees only this
/// transaction's own reads and writes, never the underlying engine. A key
/// the transaction has not written reads as absent even if the engine
/// holds it.
///
/// A key is never simultaneously staged and tombstoned: `put` clears the
/// key's tombstone and `delete` clears the key's staged write.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: TransactionId,
    start_time: i64,
    inner: Arc<Mutex<TxState>>,
}

impl Transaction {
    pub(crate) fn new(id: TransactionId) -> Self {
        Self {
            id,
            start_time: unix_nanos(),
            inner: Arc::new(Mutex::new(TxState {
                state: TransactionState::Active,
                read_set: HashMap::new(),
                write_set: HashMap::new(),
                deleted: HashSet::new(),
            })),
        }
    }

    /// Returns the transaction id.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the transaction's start time, Unix nanoseconds.
    #[must_use]
    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.inner.lock().state
    }

    /// Checks whether the transaction is still active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state() == TransactionState::Active
    }

    /// Stages a write. Clears any tombstone for the key.
    pub fn put(&self, key: &str, value: &[u8]) -> CoreResult<()> {
        let mut tx = self.inner.lock();
        tx.ensure_active()?;
        validate_key(key)?;

        tx.write_set.insert(key.to_string(), value.to_vec());
        tx.deleted.remove(key);
        Ok(())
    }

    /// Stages a delete. Clears any staged write for the key.
    pub fn delete(&self, key: &str) -> CoreResult<()> {
        let mut tx = self.inner.lock();
        tx.ensure_active()?;
        validate_key(key)?;

        tx.deleted.insert(key.to_string());
        tx.write_set.remove(key);
        Ok(())
    }

    /// Reads a key from the transaction's own staging.
    ///
    /// Checks the read set first, then the write set (promoting a copy
    /// into the read set). A key this transaction has not touched is
    /// `KeyNotFound` regardless of engine state.
    pub fn get(&self, key: &str) -> CoreResult<Vec<u8>> {
        let mut tx = self.inner.lock();
        tx.ensure_active()?;

        if let Some(value) = tx.read_set.get(key) {
            return Ok(value.clone());
        }

        if let Some(value) = tx.write_set.get(key).cloned() {
            tx.read_set.insert(key.to_string(), value.clone());
            return Ok(value);
        }

        Err(CoreError::KeyNotFound)
    }

    /// Checks whether the key is visible within the transaction.
    pub fn exists(&self, key: &str) -> CoreResult<bool> {
        let tx = self.inner.lock();
        tx.ensure_active()?;

        if tx.deleted.contains(key) {
            return Ok(false);
        }
        Ok(tx.write_set.contains_key(key) || tx.read_set.contains_key(key))
    }

    /// Returns the keys visible within the transaction: staged writes and
    /// promoted reads, minus tombstones.
    pub fn keys(&self) -> CoreResult<Vec<String>> {
        let tx = self.inner.lock();
        tx.ensure_active()?;

        let mut keys: Vec<String> = tx
            .write_set
            .keys()
            .filter(|k| !tx.deleted.contains(*k))
            .cloned()
            .collect();
        keys.extend(
            tx.read_set
                .keys()
                .filter(|k| !tx.deleted.contains(*k) && !tx.write_set.contains_key(*k))
                .cloned(),
        );
        Ok(keys)
    }

    /// Snapshots the staged write and tombstone sets for the commit path.
    ///
    /// # Errors
    ///
    /// Fails if the transaction is no longer active.
    pub(crate) fn staged_sets(&self) -> CoreResult<(HashMap<String, Vec<u8>>, HashSet<String>)> {
        let tx = self.inner.lock();
        tx.ensure_active()?;
        Ok((tx.write_set.clone(), tx.deleted.clone()))
    }

    /// Transitions out of `Active`, validating the current state.
    pub(crate) fn finish(&self, next: TransactionState) -> CoreResult<()> {
        debug_assert_ne!(next, TransactionState::Active);
        let mut tx = self.inner.lock();
        tx.ensure_active()?;
        tx.state = next;
        Ok(())
    }
}
