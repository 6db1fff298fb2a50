use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::WalletError;

/// Cell status enumeration.
///
/// The only legal transition is `Live -> Dead`, performed by whoever records
/// the consuming transaction. This crate never writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    Live,
    Dead,
}

impl CellStatus {
    /// Value persisted in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            CellStatus::Live => "live",
            CellStatus::Dead => "dead",
        }
    }

    pub fn is_live(&self) -> bool {
        *self == CellStatus::Live
    }
}

impl FromStr for CellStatus {
    type Err = WalletError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "live" => Ok(CellStatus::Live),
            "dead" => Ok(CellStatus::Dead),
            other => Err(WalletError::ConversionError(format!(
                "Unknown cell status: {other}"
            ))),
        }
    }
}
