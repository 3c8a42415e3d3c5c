//! Optimistic transactions.
//!
//! A [`Transaction`] is a local staging buffer: puts and deletes accumulate
//! in per-transaction write and tombstone sets and become visible to the
//! rest of the store only when the transaction commits. There is no
//! conflict detection and no read-through to the engine - a transaction
//! sees only what it has itself written.
//!
//! The [`TransactionManager`] issues handles with monotonically unique ids
//! (`tx_1`, `tx_2`, ...) and tracks which transactions are still active.
//! Durability and atomicity of the commit's apply step belong to the
//! storage layer that drives the commit (see [`crate::walstore::WalStore`]
//! and [`crate::store::Store`]).

mod manager;
mod state;

pub use manager::TransactionManager;
pub use state::{Transaction, TransactionState};
