use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    data_structures::{Capacity, Input},
    errors::{WalletError, WalletResult},
    storage::{CellStorage, StoredCell},
};

/// Inputs chosen to fund a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSelection {
    /// Inputs in the order they were selected (ascending capacity)
    pub inputs: Vec<Input>,
    pub total_capacity: Capacity,
}

/// Smallest-first greedy input selection over live cells.
///
/// Selection is a plain read: chosen cells are not reserved, so two
/// concurrent calls for the same lock hashes may return overlapping inputs.
/// Callers that submit the result must serialize selection per wallet or
/// re-check the inputs against the live set right before broadcast.
pub struct InputSelector {
    pub storage: Arc<dyn CellStorage>,
    pub min_cell_capacity: Capacity,
}

impl InputSelector {
    pub fn new(storage: Arc<dyn CellStorage>, min_cell_capacity: Capacity) -> Self {
        Self {
            storage,
            min_cell_capacity,
        }
    }

    /// Gather live cells owned by `lock_hashes` until they cover `capacity`.
    ///
    /// Fails with `InvalidCapacity` before touching the store if `capacity`
    /// is below the minimum cell capacity, and with `CapacityNotEnough` if all
    /// live cells together fall short.
    pub async fn gather_inputs(
        &self,
        capacity: Capacity,
        lock_hashes: &[String],
    ) -> WalletResult<InputSelection> {
        if capacity < self.min_cell_capacity {
            return Err(WalletError::InvalidCapacity {
                minimum: self.min_cell_capacity,
                requested: capacity,
            });
        }

        let cells = self.storage.get_live_cells_by_lock_hashes(lock_hashes).await?;
        debug!(
            lock_hashes = lock_hashes.len(),
            live_cells = cells.len(),
            %capacity,
            "Gathering inputs"
        );

        select_inputs(cells, capacity)
    }
}

/// Select from `cells` (in store order) until the running total exceeds `capacity`.
///
/// Cells are sorted ascending by capacity with a stable sort, so cells of equal
/// capacity keep their store order. The walk stops as soon as the total is
/// strictly greater than the target; a total that only equals the target keeps
/// consuming cells until they run out.
pub fn select_inputs(cells: Vec<StoredCell>, capacity: Capacity) -> WalletResult<InputSelection> {
    let mut candidates = cells
        .into_iter()
        .map(|cell| -> WalletResult<(Capacity, StoredCell)> {
            Ok((cell.capacity()?, cell))
        })
        .collect::<WalletResult<Vec<_>>>()?;
    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    let mut inputs = Vec::new();
    let mut total_capacity = Capacity::zero();

    for (cell_capacity, cell) in candidates {
        inputs.push(cell.to_input());
        total_capacity = total_capacity.checked_add(cell_capacity)?;
        if total_capacity > capacity {
            break;
        }
    }

    if total_capacity < capacity {
        warn!(
            available = %total_capacity,
            required = %capacity,
            "Live cells cannot cover requested capacity"
        );
        return Err(WalletError::CapacityNotEnough {
            available: total_capacity,
            required: capacity,
        });
    }

    debug!(
        inputs = inputs.len(),
        total = %total_capacity,
        "Selected inputs"
    );
    Ok(InputSelection {
        inputs,
        total_capacity,
    })
}
