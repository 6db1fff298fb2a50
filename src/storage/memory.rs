//! In-memory cell storage
//!
//! Keeps cells in insertion order so query results match what the SQLite
//! backend returns. Useful for tests and for light clients that rebuild the
//! cell set on start-up.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, RwLock,
};

use async_trait::async_trait;

use crate::{
    data_structures::OutPoint,
    errors::{WalletError, WalletResult},
};

use super::{
    cell_status::CellStatus,
    storage_trait::{CellFilter, CellStorage},
    stored_cell::StoredCell,
};

/// In-memory storage backend
#[derive(Debug, Clone, Default)]
pub struct InMemoryCellStorage {
    cells: Arc<RwLock<Vec<StoredCell>>>,
    /// Simulated backend failure for queries
    fail_queries: Arc<AtomicBool>,
}

impl InMemoryCellStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent query fail with a storage error (testing)
    pub fn set_fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    fn poisoned(operation: &str) -> WalletError {
        WalletError::StorageError(format!("Failed to {operation}: cell store lock poisoned"))
    }

    fn upsert(cells: &mut Vec<StoredCell>, cell: &StoredCell) -> WalletResult<u32> {
        if let Some(id) = cell.id {
            let existing = cells
                .iter_mut()
                .find(|c| c.id == Some(id))
                .ok_or_else(|| {
                    WalletError::StorageError(format!("Failed to save cell: no cell with id {id}"))
                })?;
            *existing = cell.clone();
            return Ok(id);
        }

        let duplicate = cells.iter().any(|c| {
            c.out_point_tx_hash == cell.out_point_tx_hash
                && c.out_point_index == cell.out_point_index
        });
        if duplicate {
            return Err(WalletError::StorageError(format!(
                "Failed to save cell: out-point {} already recorded",
                cell.out_point()
            )));
        }

        let id = cells.len() as u32 + 1;
        let mut stored = cell.clone();
        stored.id = Some(id);
        cells.push(stored);
        Ok(id)
    }
}

#[async_trait]
impl CellStorage for InMemoryCellStorage {
    async fn initialize(&self) -> WalletResult<()> {
        Ok(())
    }

    async fn get_cells(&self, filter: Option<CellFilter>) -> WalletResult<Vec<StoredCell>> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(WalletError::StorageError(
                "Failed to get cells: simulated backend failure".to_string(),
            ));
        }

        let cells = self.cells.read().map_err(|_| Self::poisoned("get cells"))?;
        let filter = filter.unwrap_or_default();
        let limit = filter.limit.unwrap_or(usize::MAX);

        Ok(cells
            .iter()
            .filter(|cell| filter.matches(cell))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn save_cell(&self, cell: &StoredCell) -> WalletResult<u32> {
        let mut cells = self.cells.write().map_err(|_| Self::poisoned("save cell"))?;
        Self::upsert(&mut cells, cell)
    }

    async fn save_cells(&self, cells: &[StoredCell]) -> WalletResult<Vec<u32>> {
        let mut stored = self.cells.write().map_err(|_| Self::poisoned("save cells"))?;
        // All or nothing, like the SQLite transaction
        let mut staged = stored.clone();
        let ids = cells
            .iter()
            .map(|cell| Self::upsert(&mut staged, cell))
            .collect::<WalletResult<Vec<_>>>()?;
        *stored = staged;
        Ok(ids)
    }

    async fn mark_cell_dead(&self, out_point: &OutPoint) -> WalletResult<bool> {
        let mut cells = self
            .cells
            .write()
            .map_err(|_| Self::poisoned("mark cell dead"))?;
        let live = cells.iter_mut().find(|c| {
            c.status == CellStatus::Live
                && c.out_point_tx_hash == out_point.tx_hash
                && c.out_point_index == out_point.index
        });
        match live {
            Some(cell) => {
                cell.status = CellStatus::Dead;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_cell_count(&self) -> WalletResult<usize> {
        let cells = self.cells.read().map_err(|_| Self::poisoned("count cells"))?;
        Ok(cells.len())
    }

    async fn close(&self) -> WalletResult<()> {
        Ok(())
    }
}
