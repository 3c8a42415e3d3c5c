//! WAL record types and serialization.

use crate::error::{CoreError, CoreResult};
use crate::types::unix_nanos;

/// Type of WAL record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LogRecordType {
    /// Store a key/value pair.
    Put = 1,
    /// Remove a key.
    Delete = 2,
    /// Transaction commit marker.
    Commit = 3,
}

impl LogRecordType {
    /// Converts a byte to a record type.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Self::Put),
            2 => Some(Self::Delete),
            3 => Some(Self::Commit),
            _ => None,
        }
    }

    /// Converts the record type to a byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

/// A WAL record.
///
/// Records carry the operation, the wall-clock timestamp at which they
/// were created (Unix nanoseconds), and - on disk - a CRC32 checksum over
/// their fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    /// Store a key/value pair.
    Put {
        /// The key being written.
        key: String,
        /// The value being written.
        value: Vec<u8>,
        /// Creation time, Unix nanoseconds.
        timestamp: i64,
    },
    /// Remove a key.
    Delete {
        /// The key being removed.
        key: String,
        /// Creation time, Unix nanoseconds.
        timestamp: i64,
    },
    /// Transaction commit marker. Ignored by replay.
    Commit {
        /// Creation time, Unix nanoseconds.
        timestamp: i64,
    },
}

impl LogRecord {
    /// Creates a Put record stamped with the current time.
    #[must_use]
    pub fn put(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::Put {
            key: key.into(),
            value: value.into(),
            timestamp: unix_nanos(),
        }
    }

    /// Creates a Delete record stamped with the current time.
    #[must_use]
    pub fn delete(key: impl Into<String>) -> Self {
        Self::Delete {
            key: key.into(),
            timestamp: unix_nanos(),
        }
    }

    /// Creates a Commit marker stamped with the current time.
    #[must_use]
    pub fn commit() -> Self {
        Self::Commit {
            timestamp: unix_nanos(),
        }
    }

    /// Returns the record type.
    #[must_use]
    pub fn record_type(&self) -> LogRecordType {
        match self {
            Self::Put { .. } => LogRecordType::Put,
            Self::Delete { .. } => LogRecordType::Delete,
            Self::Commit { .. } => LogRecordType::Commit,
        }
    }

    /// Returns the record's key (empty for Commit markers).
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Put { key, .. } | Self::Delete { key, .. } => key,
            Self::Commit { .. } => "",
        }
    }

    /// Returns the record's value, if it carries one.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        match self {
            Self::Put { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Returns the record's timestamp.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        match self {
            Self::Put { timestamp, .. }
            | Self::Delete { timestamp, .. }
            | Self::Commit { timestamp } => *timestamp,
        }
    }

    /// Computes the record checksum: CRC32 over the type byte, the key
    /// bytes, the value bytes, and the low 32 bits of the timestamp.
    #[must_use]
    pub fn checksum(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&[self.record_type().as_byte()]);
        hasher.update(self.key().as_bytes());
        if let Some(value) = self.value() {
            hasher.update(value);
        }
        let ts_low = (self.timestamp() as u64 & 0xFFFF_FFFF) as u32;
        hasher.update(&ts_low.to_le_bytes());
        hasher.finalize()
    }

    /// Serializes the record payload (the bytes that follow the frame's
    /// length prefix), checksum included.
    pub fn encode(&self) -> CoreResult<Vec<u8>> {
        let key = self.key().as_bytes();
        let key_len = u32::try_from(key.len())
            .map_err(|_| CoreError::invalid_operation("WAL record key too large"))?;

        let mut buf = Vec::with_capacity(key.len() + 32);
        buf.push(self.record_type().as_byte());
        buf.extend_from_slice(&key_len.to_le_bytes());
        buf.extend_from_slice(key);

        match self.value() {
            Some(value) => {
                let value_len = u32::try_from(value.len())
                    .map_err(|_| CoreError::invalid_operation("WAL record value too large"))?;
                buf.push(1);
                buf.extend_from_slice(&value_len.to_le_bytes());
                buf.extend_from_slice(value);
            }
            None => buf.push(0),
        }

        buf.extend_from_slice(&self.timestamp().to_le_bytes());
        buf.extend_from_slice(&self.checksum().to_le_bytes());
        Ok(buf)
    }

    /// Deserializes a record from its payload and verifies the checksum.
    ///
    /// # Errors
    ///
    /// Returns `Corruption` for undecodable payloads or a checksum
    /// mismatch, and `InvalidValue` for a Put record with no value.
    pub fn decode(payload: &[u8]) -> CoreResult<Self> {
        let mut cursor = 0usize;

        let read_u8 = |cursor: &mut usize| -> CoreResult<u8> {
            let b = *payload
                .get(*cursor)
                .ok_or_else(|| CoreError::corruption("unexpected end of WAL payload"))?;
            *cursor += 1;
            Ok(b)
        };

        let read_u32 = |cursor: &mut usize| -> CoreResult<u32> {
            let end = *cursor + 4;
            if end > payload.len() {
                return Err(CoreError::corruption("unexpected end of WAL payload"));
            }
            let bytes: [u8; 4] = payload[*cursor..end]
                .try_into()
                .map_err(|_| CoreError::corruption("invalid u32 in WAL payload"))?;
            *cursor = end;
            Ok(u32::from_le_bytes(bytes))
        };

        let read_i64 = |cursor: &mut usize| -> CoreResult<i64> {
            let end = *cursor + 8;
            if end > payload.len() {
                return Err(CoreError::corruption("unexpected end of WAL payload"));
            }
            let bytes: [u8; 8] = payload[*cursor..end]
                .try_into()
                .map_err(|_| CoreError::corruption("invalid i64 in WAL payload"))?;
            *cursor = end;
            Ok(i64::from_le_bytes(bytes))
        };

        let read_bytes = |cursor: &mut usize, len: usize| -> CoreResult<Vec<u8>> {
            let end = cursor
                .checked_add(len)
                .ok_or_else(|| CoreError::corruption("WAL payload length overflow"))?;
            if end > payload.len() {
                return Err(CoreError::corruption("unexpected end of WAL payload"));
            }
            let bytes = payload[*cursor..end].to_vec();
            *cursor = end;
            Ok(bytes)
        };

        let type_byte = read_u8(&mut cursor)?;
        let record_type = LogRecordType::from_byte(type_byte)
            .ok_or_else(|| CoreError::corruption(format!("unknown WAL record type {type_byte}")))?;

        let key_len = read_u32(&mut cursor)? as usize;
        let key_bytes = read_bytes(&mut cursor, key_len)?;
        let key = String::from_utf8(key_bytes)
            .map_err(|_| CoreError::corruption("WAL record key is not valid UTF-8"))?;

        let has_value = read_u8(&mut cursor)? != 0;
        let value = if has_value {
            let value_len = read_u32(&mut cursor)? as usize;
            Some(read_bytes(&mut cursor, value_len)?)
        } else {
            None
        };

        let timestamp = read_i64(&mut cursor)?;
        let stored_checksum = read_u32(&mut cursor)?;

        if cursor != payload.len() {
            return Err(CoreError::corruption(format!(
                "trailing bytes in WAL record: expected {cursor} bytes, got {}",
                payload.len()
            )));
        }

        let record = match record_type {
            LogRecordType::Put => {
                let value = value.ok_or(CoreError::InvalidValue)?;
                Self::Put {
                    key,
                    value,
                    timestamp,
                }
            }
            LogRecordType::Delete => {
                if value.is_some() {
                    return Err(CoreError::corruption("unexpected value in Delete record"));
                }
                Self::Delete { key, timestamp }
            }
            LogRecordType::Commit => {
                if value.is_some() {
                    return Err(CoreError::corruption("unexpected value in Commit record"));
                }
                Self::Commit { timestamp }
            }
        };

        let computed = record.checksum();
        if computed != stored_checksum {
            return Err(CoreError::corruption(format!(
                "checksum mismatch: stored {stored_checksum:08x}, computed {computed:08x}"
            )));
        }

        Ok(record)
    }
}
