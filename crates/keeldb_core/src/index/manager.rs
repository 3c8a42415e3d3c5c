//! Named index registry.

use crate::error::{CoreError, CoreResult};
use crate::index::btree::BTree;
use crate::index::hash::HashIndex;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Kind of an index structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Ordered B-tree; supports range scans.
    BTree,
    /// Bucketed hash; point lookups only.
    Hash,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BTree => write!(f, "BTREE"),
            Self::Hash => write!(f, "HASH"),
        }
    }
}

#[derive(Debug)]
enum Structure {
    BTree(BTree),
    Hash(HashIndex),
}

impl Structure {
    fn kind(&self) -> IndexKind {
        match self {
            Self::BTree(_) => IndexKind::BTree,
            Self::Hash(_) => IndexKind::Hash,
        }
    }
}

/// A named registry of secondary indexes.
///
/// The registry itself is guarded by one reader/writer lock; each index
/// structure carries its own lock, so operations on different indexes do
/// not contend.
#[derive(Debug, Default)]
pub struct IndexManager {
    indexes: RwLock<HashMap<String, Arc<RwLock<Structure>>>>,
}

impl IndexManager {
    /// Creates an empty index manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, name: &str) -> CoreResult<Arc<RwLock<Structure>>> {
        self.indexes
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::index_not_found(name))
    }

    /// Creates a B-tree index.
    ///
    /// Minimum degrees below 2 are clamped to 2.
    ///
    /// # Errors
    ///
    /// `IndexExists` if the name is already registered.
    pub fn create_btree_index(&self, name: &str, min_degree: usize) -> CoreResult<()> {
        let mut indexes = self.indexes.write();
        if indexes.contains_key(name) {
            return Err(CoreError::index_exists(name));
        }
        indexes.insert(
            name.to_string(),
            Arc::new(RwLock::new(Structure::BTree(BTree::new(min_degree)))),
        );
        debug!(name, min_degree, "created btree index");
        Ok(())
    }

    /// Creates a hash index.
    ///
    /// A bucket count of zero selects the default of 16.
    ///
    /// # Errors
    ///
    /// `IndexExists` if the name is already registered.
    pub fn create_hash_index(&self, name: &str, bucket_count: usize) -> CoreResult<()> {
        let mut indexes = self.indexes.write();
        if indexes.contains_key(name) {
            return Err(CoreError::index_exists(name));
        }
        indexes.insert(
            name.to_string(),
            Arc::new(RwLock::new(Structure::Hash(HashIndex::new(bucket_count)))),
        );
        debug!(name, bucket_count, "created hash index");
        Ok(())
    }

    /// Drops an index by name.
    pub fn drop_index(&self, name: &str) -> CoreResult<()> {
        if self.indexes.write().remove(name).is_none() {
            return Err(CoreError::index_not_found(name));
        }
        debug!(name, "dropped index");
        Ok(())
    }

    /// Inserts a key/payload pair, replacing any existing payload.
    pub fn insert(&self, name: &str, key: &str, payload: &[u8]) -> CoreResult<()> {
        let entry = self.entry(name)?;
        let mut structure = entry.write();
        match &mut *structure {
            Structure::BTree(tree) => tree.insert(key, payload),
            Structure::Hash(index) => index.insert(key, payload),
        }
        Ok(())
    }

    /// Looks up a key. Returns `None` when the key is absent.
    pub fn search(&self, name: &str, key: &str) -> CoreResult<Option<Vec<u8>>> {
        let entry = self.entry(name)?;
        let structure = entry.read();
        Ok(match &*structure {
            Structure::BTree(tree) => tree.search(key).cloned(),
            Structure::Hash(index) => index.search(key).cloned(),
        })
    }

    /// Removes a key. Returns whether it was present.
    pub fn delete(&self, name: &str, key: &str) -> CoreResult<bool> {
        let entry = self.entry(name)?;
        let mut structure = entry.write();
        Ok(match &mut *structure {
            Structure::BTree(tree) => tree.remove(key),
            Structure::Hash(index) => index.remove(key),
        })
    }

    /// Returns all `(key, payload)` pairs with `lo <= key <= hi` in
    /// lexicographic order.
    ///
    /// # Errors
    ///
    /// `UnsupportedForHash` for hash indexes.
    pub fn range(&self, name: &str, lo: &str, hi: &str) -> CoreResult<Vec<(String, Vec<u8>)>> {
        let entry = self.entry(name)?;
        let structure = entry.read();
        match &*structure {
            Structure::BTree(tree) => Ok(tree.range(lo, hi)),
            Structure::Hash(_) => Err(CoreError::UnsupportedForHash),
        }
    }

    /// Returns all `(key, payload)` pairs. Ordered for B-tree indexes,
    /// unordered for hash indexes.
    pub fn get_all(&self, name: &str) -> CoreResult<Vec<(String, Vec<u8>)>> {
        let entry = self.entry(name)?;
        let structure = entry.read();
        Ok(match &*structure {
            Structure::BTree(tree) => tree.get_all(),
            Structure::Hash(index) => index.get_all(),
        })
    }

    /// Returns the number of entries in an index.
    pub fn size(&self, name: &str) -> CoreResult<usize> {
        let entry = self.entry(name)?;
        let structure = entry.read();
        Ok(match &*structure {
            Structure::BTree(tree) => tree.len(),
            Structure::Hash(index) => index.len(),
        })
    }

    /// Returns the kind of an index.
    pub fn index_kind(&self, name: &str) -> CoreResult<IndexKind> {
        let entry = self.entry(name)?;
        let kind = entry.read().kind();
        Ok(kind)
    }

    /// Lists all registered index names, unordered.
    #[must_use]
    pub fn list_indexes(&self) -> Vec<String> {
        self.indexes.read().keys().cloned().collect()
    }

    /// Returns whether an index with the given name exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.indexes.read().contains_key(name)
    }

    /// Empties an index, re-initializing it with its original parameters.
    pub fn clear_index(&self, name: &str) -> CoreResult<()> {
        let entry = self.entry(name)?;
        let mut structure = entry.write();
        *structure = match &*structure {
            Structure::BTree(tree) => Structure::BTree(BTree::new(tree.min_degree())),
            Structure::Hash(index) => Structure::Hash(HashIndex::new(index.bucket_count())),
        };
        Ok(())
    }
}
