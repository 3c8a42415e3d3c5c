//! Get command implementation.

use keeldb_core::{CoreResult, Store};

/// Retrieves a value and prints it as UTF-8 when possible, hex otherwise.
pub fn run(store: &Store, key: &str) -> CoreResult<()> {
    let value = store.get(key)?;
    match std::str::from_utf8(&value) {
        Ok(text) => println!("{text}"),
        Err(_) => {
            let hex: String = value.iter().map(|b| format!("{b:02x}")).collect();
            println!("0x{hex}");
        }
    }
    Ok(())
}
