//! Storage engines.
//!
//! An [`Engine`] is the lowest storage tier: it holds the authoritative
//! key/value mapping and, for the disk variant, a whole-file JSON snapshot.
//!
//! All engines enforce the same contract:
//!
//! - the empty key is rejected with `InvalidKey`
//! - every operation after `close` fails with `StorageClosed`
//! - values are copied on the way in and on the way out, so callers can
//!   mutate their buffers without corrupting storage and vice versa

mod disk;
mod memory;

pub use disk::DiskEngine;
pub use memory::MemoryEngine;

use crate::error::{CoreError, CoreResult};

/// The storage engine surface.
///
/// Wrapper types such as [`crate::WalStore`] implement the same trait so
/// callers stay unaware of which flavor they hold.
pub trait Engine: Send + Sync {
    /// Returns a fresh copy of the value for `key`.
    ///
    /// # Errors
    ///
    /// `KeyNotFound` if the key is absent, `InvalidKey` for the empty key,
    /// `StorageClosed` after close.
    fn get(&self, key: &str) -> CoreResult<Vec<u8>>;

    /// Stores a copy of `value` under `key`.
    fn put(&self, key: &str, value: &[u8]) -> CoreResult<()>;

    /// Removes `key`.
    ///
    /// # Errors
    ///
    /// `KeyNotFound` if the key is absent.
    fn delete(&self, key: &str) -> CoreResult<()>;

    /// Returns whether `key` is present.
    fn exists(&self, key: &str) -> CoreResult<bool>;

    /// Returns all keys, unordered.
    fn keys(&self) -> CoreResult<Vec<String>>;

    /// Closes the engine. Idempotent; the disk engine performs a final save.
    fn close(&self) -> CoreResult<()>;
}

/// Rejects the empty key.
pub(crate) fn validate_key(key: &str) -> CoreResult<()> {
    if key.is_empty() {
        return Err(CoreError::InvalidKey);
    }
    Ok(())
}
