//! Configuration for the cell services

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    data_structures::Capacity,
    errors::{WalletError, WalletResult},
};

/// Default floor for any requested capacity, in shannons
pub const MIN_CELL_CAPACITY: u64 = 40;

/// Configuration for balance and input selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellsConfig {
    /// Smallest capacity `gather_inputs` accepts as a target
    #[serde(default = "default_min_cell_capacity")]
    pub min_cell_capacity: Capacity,
}

fn default_min_cell_capacity() -> Capacity {
    Capacity::from(MIN_CELL_CAPACITY)
}

impl Default for CellsConfig {
    fn default() -> Self {
        Self {
            min_cell_capacity: default_min_cell_capacity(),
        }
    }
}

impl CellsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum cell capacity
    pub fn with_min_cell_capacity(mut self, min_cell_capacity: Capacity) -> Self {
        self.min_cell_capacity = min_cell_capacity;
        self
    }

    /// The floor must be a positive integer
    pub fn validate(&self) -> WalletResult<()> {
        if self.min_cell_capacity.is_zero() {
            return Err(WalletError::ConfigurationError(
                "min_cell_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> WalletResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            WalletError::ConfigurationError(format!(
                "Failed to read config {}: {e}",
                path.display()
            ))
        })?;
        let config: CellsConfig = serde_json::from_str(&contents).map_err(|e| {
            WalletError::ConfigurationError(format!(
                "Failed to parse config {}: {e}",
                path.display()
            ))
        })?;
        config.validate()?;
        Ok(config)
    }
}
