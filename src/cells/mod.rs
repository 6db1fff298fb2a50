//! Cell accounting and input selection
//!
//! Read-only queries over a [`CellStorage`](crate::storage::CellStorage):
//! balance calculation, live cell lookup, smallest-first input selection and
//! key-hash discovery. [`CellsService`] bundles them behind one handle.

pub mod balance;
pub mod input_selector;
pub mod key_extractor;
pub mod live_cell;
pub mod service;

pub use balance::{get_balance, sum_capacities};
pub use input_selector::{select_inputs, InputSelection, InputSelector};
pub use key_extractor::{all_key_hashes, extract_key_hashes};
pub use live_cell::get_live_cell;
pub use service::CellsService;
