//! Core type definitions for KeelDB.

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a transaction.
///
/// Transaction ids are monotonically increasing and never reused. They
/// render as `tx_<n>`, which is also the form accepted by [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Creates a new transaction id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx_{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = crate::error::CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s
            .strip_prefix("tx_")
            .and_then(|rest| rest.parse::<u64>().ok())
            .ok_or_else(|| crate::error::CoreError::transaction_not_found(s))?;
        Ok(Self(n))
    }
}

/// Returns the current wall-clock time as Unix nanoseconds.
///
/// Saturates at `i64::MAX` rather than panicking on a far-future clock.
#[must_use]
pub fn unix_nanos() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
