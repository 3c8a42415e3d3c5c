//! Streaming WAL record reader.

use crate::error::CoreResult;
use crate::wal::record::LogRecord;
use keeldb_storage::StorageBackend;
use parking_lot::MutexGuard;

/// Size of the frame length prefix.
const FRAME_HEADER: u64 = 4;

/// A streaming iterator over WAL records.
///
/// Reads one frame at a time from the backend, keeping memory usage
/// bounded by the largest single record rather than the log size.
///
/// # Recovery Policy
///
/// - A torn tail (partial length prefix, or fewer payload bytes than the
///   prefix claims) ends iteration cleanly - it is a crash mid-append,
///   not corruption.
/// - A checksum mismatch or undecodable payload inside an intact frame
///   yields `Err(Corruption)` and ends iteration.
pub struct WalReader<'a> {
    backend: MutexGuard<'a, Box<dyn StorageBackend>>,
    total_size: u64,
    offset: u64,
    finished: bool,
}

impl<'a> WalReader<'a> {
    /// Creates a reader positioned at the start of the log.
    pub(crate) fn new(backend: MutexGuard<'a, Box<dyn StorageBackend>>) -> CoreResult<Self> {
        let total_size = backend.size()?;
        Ok(Self {
            backend,
            total_size,
            offset: 0,
            finished: false,
        })
    }

    fn read_next(&mut self) -> CoreResult<Option<(u64, LogRecord)>> {
        if self.finished {
            return Ok(None);
        }

        let record_offset = self.offset;
        let remaining = self.total_size - self.offset;

        if remaining < FRAME_HEADER {
            // Partial length prefix: torn tail, treat as end of log.
            self.finished = true;
            return Ok(None);
        }

        let len_bytes = self.backend.read_at(self.offset, FRAME_HEADER as usize)?;
        let payload_len = u64::from(u32::from_le_bytes([
            len_bytes[0],
            len_bytes[1],
            len_bytes[2],
            len_bytes[3],
        ]));

        if remaining - FRAME_HEADER < payload_len {
            // Frame claims more bytes than the log holds: torn tail.
            self.finished = true;
            return Ok(None);
        }

        let payload = self
            .backend
            .read_at(self.offset + FRAME_HEADER, payload_len as usize)?;
        let record = LogRecord::decode(&payload)?;

        self.offset += FRAME_HEADER + payload_len;
        Ok(Some((record_offset, record)))
    }
}

impl Iterator for WalReader<'_> {
    type Item = CoreResult<(u64, LogRecord)>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_next() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => None,
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::wal::WalManager;
    use keeldb_storage::InMemoryBackend;

    fn wal_bytes(records: &[LogRecord]) -> Vec<u8> {
        let mut out = Vec::new();
        for record in records {
            let payload = record.encode().unwrap();
            out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
            out.extend_from_slice(&payload);
        }
        out
    }

    fn reader_over(bytes: Vec<u8>) -> WalManager {
        WalManager::new(Box::new(InMemoryBackend::with_data(bytes)), false)
    }

    #[test]
    fn reads_all_records() {
        let records = vec![
            LogRecord::put("a", b"1".to_vec()),
            LogRecord::delete("a"),
            LogRecord::commit(),
        ];
        let wal = reader_over(wal_bytes(&records));

        let read: Vec<_> = wal
            .iter()
            .unwrap()
            .collect::<CoreResult<Vec<_>>>()
            .unwrap();
        assert_eq!(read.len(), 3);
        for (expected, (_, actual)) in records.iter().zip(&read) {
            assert_eq!(expected, actual);
        }
    }

    #[test]
    fn offsets_are_frame_starts() {
        let records = vec![
            LogRecord::put("a", b"1".to_vec()),
            LogRecord::put("b", b"2".to_vec()),
        ];
        let wal = reader_over(wal_bytes(&records));

        let read: Vec<_> = wal
            .iter()
            .unwrap()
            .collect::<CoreResult<Vec<_>>>()
            .unwrap();
        assert_eq!(read[0].0, 0);
        let first_frame_len = 4 + records[0].encode().unwrap().len() as u64;
        assert_eq!(read[1].0, first_frame_len);
    }

    #[test]
    fn torn_payload_ends_iteration_cleanly() {
        let mut bytes = wal_bytes(&[
            LogRecord::put("a", b"1".to_vec()),
            LogRecord::put("b", b"2".to_vec()),
        ]);
        // Chop the second record mid-payload.
        bytes.truncate(bytes.len() - 5);
        let wal = reader_over(bytes);

        let read: Vec<_> = wal
            .iter()
            .unwrap()
            .collect::<CoreResult<Vec<_>>>()
            .unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].1.key(), "a");
    }

    #[test]
    fn torn_length_prefix_ends_iteration_cleanly() {
        let mut bytes = wal_bytes(&[LogRecord::put("a", b"1".to_vec())]);
        // Leave two stray bytes after the intact record.
        bytes.extend_from_slice(&[0xAA, 0xBB]);
        let wal = reader_over(bytes);

        let read: Vec<_> = wal
            .iter()
            .unwrap()
            .collect::<CoreResult<Vec<_>>>()
            .unwrap();
        assert_eq!(read.len(), 1);
    }

    #[test]
    fn corrupted_payload_surfaces_error() {
        let mut bytes = wal_bytes(&[LogRecord::put("key", b"value".to_vec())]);
        // Flip a byte inside the first record's payload (past the prefix).
        bytes[10] ^= 0xFF;
        let wal = reader_over(bytes);

        let results: Vec<_> = wal.iter().unwrap().collect();
        assert!(matches!(
            results.last(),
            Some(Err(CoreError::Corruption { .. }))
        ));
    }

    #[test]
    fn iteration_stops_after_error() {
        let mut bytes = wal_bytes(&[
            LogRecord::put("key", b"value".to_vec()),
            LogRecord::put("later", b"record".to_vec()),
        ]);
        bytes[10] ^= 0xFF;
        let wal = reader_over(bytes);

        let results: Vec<_> = wal.iter().unwrap().collect();
        // The corrupt first record ends iteration; the intact second
        // record is never reached.
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
