//! Exists command implementation.

use keeldb_core::{CoreResult, Store};

/// Prints whether a key exists.
pub fn run(store: &Store, key: &str) -> CoreResult<()> {
    println!("{}", store.exists(key)?);
    Ok(())
}
