//! Error types for cell accounting and input selection
//!
//! All fallible operations in this crate return [`WalletResult`]. Lookups that
//! find nothing are not errors and are reported as `Ok(None)` instead.

use thiserror::Error;

use crate::data_structures::Capacity;

/// Main error type for the cell libraries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Requested capacity is below the configured minimum cell capacity
    #[error("capacity can't be less than {minimum} (requested {requested})")]
    InvalidCapacity {
        minimum: Capacity,
        requested: Capacity,
    },

    /// Live cells do not hold enough capacity to cover the request
    #[error("Capacity not enough. Available: {available}, required: {required}")]
    CapacityNotEnough {
        available: Capacity,
        required: Capacity,
    },

    /// Capacity accumulator exceeded 256 bits
    #[error("Capacity overflow while summing cells")]
    CapacityOverflow,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Conversion error: {0}")]
    ConversionError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type for cell library operations
pub type WalletResult<T> = Result<T, WalletError>;

impl WalletError {
    /// True for errors the caller can fix by changing the request
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidCapacity { .. }
                | WalletError::CapacityNotEnough { .. }
                | WalletError::InvalidArgument(_)
        )
    }
}
