//! Checkpoint command implementation.

use keeldb_core::{CoreResult, Store};

/// Truncates the write-ahead log.
pub fn run(store: &Store) -> CoreResult<()> {
    let before = store.wal_size()?;
    store.checkpoint()?;
    println!("checkpoint complete: {before} bytes truncated");
    Ok(())
}
