//! Storage trait definition for cell persistence
//!
//! This module defines the `CellStorage` trait that the cell services read
//! from. Cells are written by the chain sync process; the services only use
//! the query half of the trait.

use async_trait::async_trait;

use crate::{data_structures::OutPoint, errors::WalletResult};

use super::cell_status::CellStatus;
use super::stored_cell::StoredCell;

/// Query filters for retrieving cells
#[derive(Debug, Clone, Default)]
pub struct CellFilter {
    /// Restrict to cells whose lock hash is in this set
    pub lock_hashes: Option<Vec<String>>,
    /// Filter by cell status
    pub status: Option<CellStatus>,
    /// Filter by out-point
    pub out_point: Option<OutPoint>,
    /// Limit number of results
    pub limit: Option<usize>,
}

impl CellFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Live cells owned by any of `lock_hashes`
    pub fn live_by_lock_hashes(lock_hashes: &[String]) -> Self {
        Self::new()
            .with_lock_hashes(lock_hashes.to_vec())
            .with_status(CellStatus::Live)
    }

    pub fn with_lock_hashes(mut self, lock_hashes: Vec<String>) -> Self {
        self.lock_hashes = Some(lock_hashes);
        self
    }

    pub fn with_status(mut self, status: CellStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_out_point(mut self, out_point: OutPoint) -> Self {
        self.out_point = Some(out_point);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `cell` satisfies every condition of this filter (limit excluded)
    pub fn matches(&self, cell: &StoredCell) -> bool {
        if let Some(ref lock_hashes) = self.lock_hashes {
            if !lock_hashes.iter().any(|h| *h == cell.lock_hash) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if cell.status != status {
                return false;
            }
        }
        if let Some(ref out_point) = self.out_point {
            if cell.out_point_tx_hash != out_point.tx_hash
                || cell.out_point_index != out_point.index
            {
                return false;
            }
        }
        true
    }
}

/// Trait for cell storage backends.
///
/// Query results are returned in store order (insertion order). Input
/// selection relies on this for its tie-break between equal capacities.
#[async_trait]
pub trait CellStorage: Send + Sync {
    /// Initialize the storage backend (create tables, indexes, etc.)
    async fn initialize(&self) -> WalletResult<()>;

    // === Query surface ===

    /// Get cells matching the filter, in store order
    async fn get_cells(&self, filter: Option<CellFilter>) -> WalletResult<Vec<StoredCell>>;

    /// Get all live cells owned by any of the given lock hashes
    async fn get_live_cells_by_lock_hashes(
        &self,
        lock_hashes: &[String],
    ) -> WalletResult<Vec<StoredCell>> {
        if lock_hashes.is_empty() {
            return Ok(Vec::new());
        }
        self.get_cells(Some(CellFilter::live_by_lock_hashes(lock_hashes)))
            .await
    }

    /// Get the live cell at an out-point, if there is one
    async fn get_live_cell(&self, out_point: &OutPoint) -> WalletResult<Option<StoredCell>> {
        let filter = CellFilter::new()
            .with_out_point(out_point.clone())
            .with_status(CellStatus::Live)
            .with_limit(1);
        Ok(self.get_cells(Some(filter)).await?.into_iter().next())
    }

    /// Get every recorded cell regardless of status
    async fn get_all_cells(&self) -> WalletResult<Vec<StoredCell>> {
        self.get_cells(None).await
    }

    // === Write surface (sync process only) ===

    /// Save a cell record, returning its ID
    async fn save_cell(&self, cell: &StoredCell) -> WalletResult<u32>;

    /// Save multiple cell records in one batch
    async fn save_cells(&self, cells: &[StoredCell]) -> WalletResult<Vec<u32>>;

    /// Mark the cell at `out_point` as dead. Returns false if no live cell was found
    async fn mark_cell_dead(&self, out_point: &OutPoint) -> WalletResult<bool>;

    /// Get total cell count
    async fn get_cell_count(&self) -> WalletResult<usize>;

    /// Close the storage connection gracefully
    async fn close(&self) -> WalletResult<()>;
}
