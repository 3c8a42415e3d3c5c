//! Transaction manager.

use crate::error::{CoreError, CoreResult};
use crate::transaction::state::{Transaction, TransactionState};
use crate::types::TransactionId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Issues transaction handles and tracks the active set.
///
/// Ids are monotonically unique (`tx_1`, `tx_2`, ...). A transaction is
/// registered at `begin` and removed on commit or abort. There is no
/// conflict detection: a commit always succeeds at this layer as long as
/// the transaction is still active.
pub struct TransactionManager {
    next_id: AtomicU64,
    active: RwLock<HashMap<TransactionId, Transaction>>,
}

impl TransactionManager {
    /// Creates a new transaction manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            active: RwLock::new(HashMap::new()),
        }
    }

    /// Begins a new transaction.
    pub fn begin(&self) -> Transaction {
        let id = TransactionId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let txn = Transaction::new(id);
        self.active.write().insert(id, txn.clone());
        debug!(%id, "transaction started");
        txn
    }

    /// Looks up an active transaction by id.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound` if no active transaction has the id.
    pub fn get(&self, id: TransactionId) -> CoreResult<Transaction> {
        self.active
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::transaction_not_found(id.to_string()))
    }

    /// Marks the transaction committed and drops it from the active set.
    ///
    /// The caller is responsible for having applied (and, when a WAL is in
    /// play, logged) the staged sets first.
    pub fn commit(&self, txn: &Transaction) -> CoreResult<()> {
        txn.finish(TransactionState::Committed)?;
        self.active.write().remove(&txn.id());
        debug!(id = %txn.id(), "transaction committed");
        Ok(())
    }

    /// Marks the transaction aborted and drops it from the active set.
    /// Staged writes and tombstones are discarded.
    pub fn abort(&self, txn: &Transaction) -> CoreResult<()> {
        txn.finish(TransactionState::Aborted)?;
        self.active.write().remove(&txn.id());
        debug!(id = %txn.id(), "transaction aborted");
        Ok(())
    }

    /// Returns the number of active transactions.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.read().len()
    }
}

impl Default for TransactionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TransactionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManager")
            .field("active", &self.active_count())
            .finish_non_exhaustive()
    }
}
