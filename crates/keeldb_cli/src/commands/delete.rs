//! Delete command implementation.

use keeldb_core::{CoreResult, Store};

/// Removes a key.
pub fn run(store: &Store, key: &str) -> CoreResult<()> {
    store.delete(key)?;
    println!("OK");
    Ok(())
}
