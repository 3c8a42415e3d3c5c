//! # KeelDB Core
//!
//! Embedded, single-process key/value storage core.
//!
//! The crate layers three concerns:
//! - Storage engines with pluggable backing ([`engine::MemoryEngine`],
//!   [`engine::DiskEngine`])
//! - A write-ahead log for crash recovery and checkpoint truncation
//!   ([`wal::WalManager`], [`walstore::WalStore`])
//! - Optimistic transactions with per-transaction staging that is promoted
//!   into the engine atomically on commit ([`transaction`])
//!
//! Secondary indexes ([`index::IndexManager`]) and the [`store::Store`]
//! facade sit on top.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod index;
pub mod store;
pub mod transaction;
pub mod types;
pub mod wal;
pub mod walstore;

pub use config::{Config, StorageKind};
pub use engine::{DiskEngine, Engine, MemoryEngine};
pub use error::{CoreError, CoreResult};
pub use index::IndexManager;
pub use store::Store;
pub use transaction::{Transaction, TransactionManager};
pub use types::TransactionId;
pub use walstore::WalStore;

/// Current version of KeelDB core.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
