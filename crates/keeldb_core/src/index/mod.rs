//! Secondary indexes.
//!
//! Indexes are in-memory acceleration structures over `String` keys and
//! opaque byte payloads, maintained by the caller (typically a query
//! executor) alongside engine writes. They are not persisted and are not
//! rebuilt from storage on open.
//!
//! Two structures are available:
//!
//! - [`BTree`] - ordered; supports point lookups and inclusive range scans
//! - [`HashIndex`] - bucketed; point lookups only
//!
//! The [`IndexManager`] owns all index structures behind a named registry.

mod btree;
mod hash;
mod manager;

pub use btree::BTree;
pub use hash::HashIndex;
pub use manager::{IndexKind, IndexManager};
