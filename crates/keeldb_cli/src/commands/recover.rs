//! Recover command implementation.

use keeldb_core::{CoreResult, Store};

/// Replays the write-ahead log into the engine.
pub fn run(store: &Store) -> CoreResult<()> {
    let applied = store.recover()?;
    println!("recovery complete: {applied} records applied");
    Ok(())
}
