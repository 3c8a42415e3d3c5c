//! Write-Ahead Log (WAL) for durability and crash recovery.
//!
//! The WAL gives callers "log-then-apply" durability over an engine that
//! otherwise only persists on snapshot boundaries. All mutations are
//! appended and fsynced before they are applied; on reopen, the log is
//! replayed into the engine.
//!
//! ## Record Format
//!
//! ```text
//! | length (u32 LE) | payload (length bytes) |
//!
//! payload:
//! | type (1) | key len (u32 LE) | key | value flag (1)
//! | [value len (u32 LE) | value] | timestamp (i64 LE) | crc32 (u32 LE) |
//! ```
//!
//! The checksum covers the type byte, the key bytes, the value bytes, and
//! the low 32 bits of the timestamp, so it is reproducible from the
//! decoded fields.
//!
//! ## Recovery Policy
//!
//! Replay distinguishes **tolerated** from **fatal** conditions:
//!
//! - A torn tail (partial length prefix, or fewer payload bytes than the
//!   prefix claims) is treated as the clean end of the log. It represents
//!   a crash mid-append before fsync completed; the partial record is
//!   discarded.
//! - A checksum mismatch or an undecodable payload inside an intact frame
//!   is `Corruption` and aborts replay. No heuristic repair is attempted.
//!
//! Commit markers are audit boundaries, not reapplication events: replay
//! applies every intact Put/Delete and ignores Commits. The durability
//! unit is the single record.

mod manager;
mod reader;
mod record;

pub use manager::WalManager;
pub use reader::WalReader;
pub use record::{LogRecord, LogRecordType};
