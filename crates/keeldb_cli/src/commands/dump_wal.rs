//! Dump-wal command implementation.

use keeldb_core::wal::WalManager;
use keeldb_storage::FileBackend;
use serde::Serialize;
use std::path::Path;

/// WAL record representation for output.
#[derive(Debug, Serialize)]
pub struct WalRecordInfo {
    /// Offset of the record's frame in the WAL file.
    pub offset: u64,
    /// Record type.
    pub record_type: String,
    /// Record key (empty for commit markers).
    pub key: String,
    /// Value size in bytes, for Put records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_size: Option<usize>,
    /// Record timestamp, Unix nanoseconds.
    pub timestamp: i64,
}

/// Runs the dump-wal command.
pub fn run(
    wal_path: &Path,
    limit: Option<usize>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !wal_path.exists() {
        return Err(format!("WAL file not found: {}", wal_path.display()).into());
    }

    let backend = FileBackend::open(wal_path)?;
    let wal = WalManager::new(Box::new(backend), false);

    let max_records = limit.unwrap_or(usize::MAX);
    let mut records = Vec::new();
    for result in wal.iter()? {
        if records.len() >= max_records {
            break;
        }
        let (offset, record) = result?;
        records.push(WalRecordInfo {
            offset,
            record_type: format!("{:?}", record.record_type()),
            key: record.key().to_string(),
            value_size: record.value().map(<[u8]>::len),
            timestamp: record.timestamp(),
        });
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&records)?),
        _ => {
            for info in &records {
                let size = info
                    .value_size
                    .map_or(String::new(), |n| format!(" ({n} bytes)"));
                println!(
                    "{:>8}  {:<6} {}{}  ts={}",
                    info.offset, info.record_type, info.key, size, info.timestamp
                );
            }
            println!("{} records", records.len());
        }
    }

    Ok(())
}
