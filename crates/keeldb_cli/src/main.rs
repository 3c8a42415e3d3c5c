//! KeelDB CLI
//!
//! Command-line interface over the KeelDB store.
//!
//! # Commands
//!
//! - `set` / `get` / `delete` / `exists` / `list` - direct key/value operations
//! - `checkpoint` - truncate the write-ahead log
//! - `recover` - replay the write-ahead log into the engine
//! - `dump-wal` - print raw WAL records for debugging
//! - `version` - show version information

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use keeldb_core::{Config, Store};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Which engine backs the store.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StorageArg {
    /// In-process map (pair with the WAL for persistence).
    Memory,
    /// File-backed JSON snapshot.
    Disk,
}

/// KeelDB command-line key/value store.
#[derive(Parser)]
#[command(name = "keeldb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage engine to use
    #[arg(global = true, long, value_enum, default_value = "disk")]
    storage: StorageArg,

    /// Path to the snapshot file (disk storage only)
    #[arg(global = true, long, default_value = "keeldb.json")]
    data_file: PathBuf,

    /// Disable the write-ahead log
    #[arg(global = true, long)]
    no_wal: bool,

    /// Path to the WAL file (defaults to the data file with a .wal extension)
    #[arg(global = true, long)]
    wal_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a key/value pair
    Set {
        /// Key to store
        key: String,
        /// Value to store
        value: String,
    },

    /// Retrieve a value by key
    Get {
        /// Key to look up
        key: String,
    },

    /// Remove a key
    Delete {
        /// Key to remove
        key: String,
    },

    /// Check whether a key exists
    Exists {
        /// Key to check
        key: String,
    },

    /// List all keys
    List,

    /// Truncate the write-ahead log
    Checkpoint,

    /// Replay the write-ahead log into the engine
    Recover,

    /// Dump raw WAL records for debugging
    DumpWal {
        /// Maximum number of records to dump
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = match self.storage {
            StorageArg::Memory => Config::memory(),
            StorageArg::Disk => Config::disk(&self.data_file),
        };
        config.wal_enabled = !self.no_wal;
        config.wal_path = self.wal_file.clone();
        config
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Version => {
            println!("KeelDB CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("KeelDB Core v{}", keeldb_core::VERSION);
            return Ok(());
        }
        Commands::DumpWal { limit, format } => {
            let wal_path = cli.config().resolved_wal_path();
            commands::dump_wal::run(&wal_path, *limit, format)?;
            return Ok(());
        }
        _ => {}
    }

    let store = Store::open(cli.config())?;

    let result = match &cli.command {
        Commands::Set { key, value } => commands::set::run(&store, key, value),
        Commands::Get { key } => commands::get::run(&store, key),
        Commands::Delete { key } => commands::delete::run(&store, key),
        Commands::Exists { key } => commands::exists::run(&store, key),
        Commands::List => commands::list::run(&store),
        Commands::Checkpoint => commands::checkpoint::run(&store),
        Commands::Recover => commands::recover::run(&store),
        Commands::Version | Commands::DumpWal { .. } => unreachable!("handled above"),
    };

    store.close()?;
    result?;
    Ok(())
}
