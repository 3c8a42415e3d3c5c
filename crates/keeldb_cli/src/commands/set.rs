//! Set command implementation.

use keeldb_core::{CoreResult, Store};

/// Stores a key/value pair.
pub fn run(store: &Store, key: &str, value: &str) -> CoreResult<()> {
    store.put(key, value.as_bytes())?;
    println!("OK");
    Ok(())
}
