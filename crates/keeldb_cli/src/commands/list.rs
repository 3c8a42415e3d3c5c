//! List command implementation.

use keeldb_core::{CoreResult, Store};

/// Prints all keys, sorted, one per line.
pub fn run(store: &Store) -> CoreResult<()> {
    let mut keys = store.keys()?;
    keys.sort();
    for key in keys {
        println!("{key}");
    }
    Ok(())
}
