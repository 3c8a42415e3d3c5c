//! Hash index.

use std::collections::HashMap;
use std::hash::Hasher;
use twox_hash::XxHash32;

/// Bucket count used when a caller passes zero.
pub const DEFAULT_BUCKET_COUNT: usize = 16;

/// A bucketed hash index for point lookups.
///
/// Keys are distributed over a fixed array of chained buckets by a
/// non-cryptographic 32-bit hash. Only equality lookups are supported;
/// range queries require a [`super::BTree`].
#[derive(Debug)]
pub struct HashIndex {
    buckets: Vec<HashMap<String, Vec<u8>>>,
    len: usize,
}

impl HashIndex {
    /// Creates a hash index with the given number of buckets.
    ///
    /// A bucket count of zero selects [`DEFAULT_BUCKET_COUNT`].
    #[must_use]
    pub fn new(bucket_count: usize) -> Self {
        let bucket_count = if bucket_count == 0 {
            DEFAULT_BUCKET_COUNT
        } else {
            bucket_count
        };
        Self {
            buckets: (0..bucket_count).map(|_| HashMap::new()).collect(),
            len: 0,
        }
    }

    /// Returns the configured bucket count.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_for(&self, key: &str) -> usize {
        let mut hasher = XxHash32::with_seed(0);
        hasher.write(key.as_bytes());
        (hasher.finish() as u32 as usize) % self.buckets.len()
    }

    /// Inserts a key/payload pair, replacing any existing payload.
    pub fn insert(&mut self, key: &str, value: &[u8]) {
        let bucket = self.bucket_for(key);
        if self.buckets[bucket]
            .insert(key.to_string(), value.to_vec())
            .is_none()
        {
            self.len += 1;
        }
    }

    /// Looks up a key.
    #[must_use]
    pub fn search(&self, key: &str) -> Option<&Vec<u8>> {
        let bucket = self.bucket_for(key);
        self.buckets[bucket].get(key)
    }

    /// Removes a key. Returns whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let bucket = self.bucket_for(key);
        if self.buckets[bucket].remove(key).is_some() {
            self.len -= 1;
            true
        } else {
            false
        }
    }

    /// Returns all `(key, payload)` pairs, unordered.
    #[must_use]
    pub fn get_all(&self) -> Vec<(String, Vec<u8>)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k.clone(), v.clone())))
            .collect()
    }
}
