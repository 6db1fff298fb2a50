use crate::{
    data_structures::{Cell, OutPoint},
    errors::WalletResult,
    storage::CellStorage,
};

/// Resolve the live cell at `out_point`.
///
/// Spent and unknown out-points both yield `Ok(None)`; only store faults are errors.
pub async fn get_live_cell(
    storage: &dyn CellStorage,
    out_point: &OutPoint,
) -> WalletResult<Option<Cell>> {
    match storage.get_live_cell(out_point).await? {
        Some(stored) => Ok(Some(stored.to_cell()?)),
        None => Ok(None),
    }
}
