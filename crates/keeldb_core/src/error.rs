//! Error types for KeelDB core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in KeelDB core operations.
///
/// Every layer surfaces one of these kinds; errors bubble up unchanged
/// apart from added context in the message fields. The core performs no
/// internal retry.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] keeldb_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Key is not present in the engine.
    #[error("key not found")]
    KeyNotFound,

    /// Key already exists.
    ///
    /// Reserved for engines with insert-only semantics; the current
    /// engines never raise it.
    #[error("key already exists")]
    KeyExists,

    /// Key is the empty string.
    #[error("invalid key")]
    InvalidKey,

    /// Value is absent where one is required.
    #[error("invalid value")]
    InvalidValue,

    /// Operation attempted after the engine was closed.
    #[error("storage is closed")]
    StorageClosed,

    /// The manager has no transaction with the given id.
    #[error("transaction not found: {id}")]
    TransactionNotFound {
        /// The id that failed to resolve.
        id: String,
    },

    /// Operation on a transaction that has been aborted.
    #[error("transaction aborted")]
    TransactionAborted,

    /// Operation on a transaction that has been committed.
    #[error("transaction already committed")]
    TransactionAlreadyCommitted,

    /// A log record failed its checksum, or a snapshot file failed to decode.
    #[error("corruption detected: {message}")]
    Corruption {
        /// Description of the corruption.
        message: String,
    },

    /// Operation on an unregistered index name.
    #[error("index not found: {name}")]
    IndexNotFound {
        /// The index name that failed to resolve.
        name: String,
    },

    /// Index creation with a name that is already registered.
    #[error("index already exists: {name}")]
    IndexExists {
        /// The conflicting index name.
        name: String,
    },

    /// Range query against a hash index.
    #[error("range queries are not supported for hash indexes")]
    UnsupportedForHash,

    /// Operation not permitted in the current configuration or state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

impl CoreError {
    /// Creates a corruption error.
    pub fn corruption(message: impl Into<String>) -> Self {
        Self::Corruption {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates a transaction-not-found error.
    pub fn transaction_not_found(id: impl Into<String>) -> Self {
        Self::TransactionNotFound { id: id.into() }
    }

    /// Creates an index-not-found error.
    pub fn index_not_found(name: impl Into<String>) -> Self {
        Self::IndexNotFound { name: name.into() }
    }

    /// Creates an index-exists error.
    pub fn index_exists(name: impl Into<String>) -> Self {
        Self::IndexExists { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = CoreError::corruption("checksum mismatch at offset 42");
        assert_eq!(
            err.to_string(),
            "corruption detected: checksum mismatch at offset 42"
        );

        let err = CoreError::index_not_found("users_by_name");
        assert_eq!(err.to_string(), "index not found: users_by_name");
    }

    #[test]
    fn io_errors_convert() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: CoreError = io_err.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
