use tracing::debug;

use crate::{
    data_structures::Capacity,
    errors::WalletResult,
    storage::{CellStorage, StoredCell},
};

/// Sum the capacities of all live cells owned by any of `lock_hashes`.
///
/// Returns zero for an empty lock-hash set without querying the store.
pub async fn get_balance(
    storage: &dyn CellStorage,
    lock_hashes: &[String],
) -> WalletResult<Capacity> {
    if lock_hashes.is_empty() {
        return Ok(Capacity::zero());
    }

    let cells = storage.get_live_cells_by_lock_hashes(lock_hashes).await?;
    let balance = sum_capacities(&cells)?;

    debug!(
        lock_hashes = lock_hashes.len(),
        live_cells = cells.len(),
        %balance,
        "Computed balance"
    );
    Ok(balance)
}

/// Exact sum of the cells' capacities
pub fn sum_capacities(cells: &[StoredCell]) -> WalletResult<Capacity> {
    let capacities = cells
        .iter()
        .map(StoredCell::capacity)
        .collect::<WalletResult<Vec<_>>>()?;
    Capacity::checked_sum(capacities)
}
