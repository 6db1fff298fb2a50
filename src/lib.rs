//! Cell libraries for CKB wallets
//!
//! This crate provides the cell accounting core of a CKB wallet: exact
//! balances over live cells, smallest-first input selection for new
//! transactions, live cell lookup and key-hash discovery.
//!
//! ## Features
//!
//! - `storage` (default): Enables the SQLite cell store
//! - `cli`: Builds the `cells` query binary
//!
//! Without the `storage` feature only the in-memory cell store is available.
//!
//! ## Concurrency
//!
//! All queries are read-only. Input selection does not reserve the cells it
//! picks; callers that build and submit transactions must serialize selection
//! per wallet or call [`CellsService::revalidate_inputs`] before broadcast.

pub mod cells;
pub mod config;
pub mod data_structures;
pub mod errors;
pub mod hex_utils;
pub mod storage;

pub use cells::*;
pub use config::*;
pub use data_structures::*;
pub use errors::*;
pub use hex_utils::*;
pub use storage::*;
