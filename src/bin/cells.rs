//! Cell store query tool
//!
//! Runs the read-only cell queries against a SQLite cell store and prints the
//! result as JSON.
//!
//! ## Usage
//! ```bash
//! # Balance of one or more lock hashes
//! cargo run --bin cells --features cli -- --database cells.db balance --lock-hash 0x...
//!
//! # Gather inputs for 100 CKB
//! cargo run --bin cells --features cli -- gather --capacity 10000000000 --lock-hash 0x...
//!
//! # Look up a live cell
//! cargo run --bin cells --features cli -- live-cell --tx-hash 0x... --index 0
//!
//! # List key hashes seen in the store
//! cargo run --bin cells --features cli -- key-hashes
//! ```
//!
//! Set `RUST_LOG=debug` (or pass `--verbose`) to see query logging.

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use lightweight_cell_libs::{
    cells::CellsService,
    config::CellsConfig,
    data_structures::OutPoint,
    errors::{WalletError, WalletResult},
    storage::{CellStorage, SqliteCellStorage},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// SQLite cell store
    #[arg(short, long, default_value = "./cells.db")]
    database: PathBuf,

    /// JSON file with a `min_cell_capacity` override
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sum the capacity of live cells owned by the lock hashes
    Balance {
        #[arg(long = "lock-hash", required = true)]
        lock_hashes: Vec<String>,
    },
    /// Look up the live cell at an out-point
    LiveCell {
        #[arg(long)]
        tx_hash: String,
        #[arg(long)]
        index: u32,
    },
    /// Select inputs covering a capacity (decimal shannons)
    Gather {
        #[arg(long)]
        capacity: String,
        #[arg(long = "lock-hash", required = true)]
        lock_hashes: Vec<String>,
    },
    /// List distinct key hashes referenced by recorded cells
    KeyHashes,
}

fn print_json<T: Serialize>(value: &T) -> WalletResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| WalletError::ConversionError(format!("Failed to encode output: {e}")))?;
    println!("{json}");
    Ok(())
}

async fn run(args: CliArgs) -> WalletResult<()> {
    let config = match args.config {
        Some(ref path) => CellsConfig::from_json_file(path)?,
        None => CellsConfig::default(),
    };

    let storage = SqliteCellStorage::new(&args.database).await?;
    storage.initialize().await?;
    let service = CellsService::new(Arc::new(storage), config)?;

    match args.command {
        Command::Balance { lock_hashes } => {
            let balance = service.get_balance(&lock_hashes).await?;
            print_json(&serde_json::json!({ "balance": balance }))
        }
        Command::LiveCell { tx_hash, index } => {
            let cell = service
                .get_live_cell(&OutPoint::new(tx_hash, index))
                .await?;
            print_json(&cell)
        }
        Command::Gather {
            capacity,
            lock_hashes,
        } => {
            let selection = service.gather_inputs(&capacity, &lock_hashes).await?;
            print_json(&selection)
        }
        Command::KeyHashes => {
            let key_hashes = service.all_key_hashes().await?;
            print_json(&key_hashes)
        }
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
