use std::{collections::BTreeSet, sync::Arc};

use tracing::debug;

use crate::{
    config::CellsConfig,
    data_structures::{Capacity, Cell, Input, OutPoint},
    errors::WalletResult,
    storage::CellStorage,
};

use super::{
    balance,
    input_selector::{InputSelection, InputSelector},
    key_extractor, live_cell,
};

/// Read-only cell queries for a wallet, backed by a shared cell store.
///
/// Every method takes `&self` and never writes to the store, so one service
/// can be cloned and queried from many tasks at once.
#[derive(Clone)]
pub struct CellsService {
    storage: Arc<dyn CellStorage>,
    config: CellsConfig,
}

impl CellsService {
    pub fn new(storage: Arc<dyn CellStorage>, config: CellsConfig) -> WalletResult<Self> {
        config.validate()?;
        Ok(Self { storage, config })
    }

    pub fn with_defaults(storage: Arc<dyn CellStorage>) -> Self {
        Self {
            storage,
            config: CellsConfig::default(),
        }
    }

    pub fn config(&self) -> &CellsConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn CellStorage> {
        &self.storage
    }

    /// Total capacity of live cells owned by `lock_hashes`
    pub async fn get_balance(&self, lock_hashes: &[String]) -> WalletResult<Capacity> {
        balance::get_balance(self.storage.as_ref(), lock_hashes).await
    }

    /// The live cell at `out_point`, or `None` if it is spent or unknown
    pub async fn get_live_cell(&self, out_point: &OutPoint) -> WalletResult<Option<Cell>> {
        live_cell::get_live_cell(self.storage.as_ref(), out_point).await
    }

    /// Gather inputs covering a capacity given as a decimal string
    pub async fn gather_inputs(
        &self,
        capacity: &str,
        lock_hashes: &[String],
    ) -> WalletResult<InputSelection> {
        let capacity = Capacity::from_dec_str(capacity)?;
        self.gather_inputs_for(capacity, lock_hashes).await
    }

    /// Gather inputs covering `capacity`. See [`InputSelector::gather_inputs`]
    pub async fn gather_inputs_for(
        &self,
        capacity: Capacity,
        lock_hashes: &[String],
    ) -> WalletResult<InputSelection> {
        InputSelector::new(self.storage.clone(), self.config.min_cell_capacity)
            .gather_inputs(capacity, lock_hashes)
            .await
    }

    /// Distinct key hashes referenced by any recorded cell
    pub async fn all_key_hashes(&self) -> WalletResult<BTreeSet<String>> {
        key_extractor::all_key_hashes(self.storage.as_ref()).await
    }

    /// Previous outputs of `inputs` that are no longer live.
    ///
    /// Selection does not reserve cells, so a coordinator runs this right
    /// before broadcasting and re-selects if anything comes back.
    pub async fn revalidate_inputs(&self, inputs: &[Input]) -> WalletResult<Vec<OutPoint>> {
        let mut stale = Vec::new();
        for input in inputs {
            if self.storage.get_live_cell(&input.previous_output).await?.is_none() {
                stale.push(input.previous_output.clone());
            }
        }
        debug!(
            inputs = inputs.len(),
            stale = stale.len(),
            "Revalidated inputs"
        );
        Ok(stale)
    }
}
