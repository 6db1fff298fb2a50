use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
    data_structures::{Capacity, Script},
    storage::CellStatus,
};

/// Since value of a freshly gathered input (no maturity or time lock)
pub const DEFAULT_SINCE: &str = "0";

/// Identity of a cell: the issuing transaction and the output index within it
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutPoint {
    pub tx_hash: String,
    pub index: u32,
}

impl OutPoint {
    pub fn new(tx_hash: impl Into<String>, index: u32) -> Self {
        Self {
            tx_hash: tx_hash.into(),
            index,
        }
    }
}

impl Display for OutPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}

/// External-facing view of a recorded cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub out_point: OutPoint,
    pub capacity: Capacity,
    pub lock: Option<Script>,
    pub lock_hash: String,
    pub status: CellStatus,
}

/// A reference to an existing cell being consumed by a new transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    pub previous_output: OutPoint,
    pub since: String,
    /// Snapshot of the referenced cell's lock
    pub lock: Option<Script>,
}

impl Input {
    /// Build an input spending `out_point` with no since constraint
    pub fn new(previous_output: OutPoint, lock: Option<Script>) -> Self {
        Self {
            previous_output,
            since: DEFAULT_SINCE.to_string(),
            lock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_defaults_since_to_zero() {
        let input = Input::new(OutPoint::new("0xaa", 1), None);
        assert_eq!(input.since, "0");
        assert_eq!(input.previous_output.to_string(), "0xaa:1");
    }

    #[test]
    fn test_cell_json_shape() {
        let cell = Cell {
            out_point: OutPoint::new("0xbb", 0),
            capacity: Capacity::from(100u64),
            lock: None,
            lock_hash: "0xcc".to_string(),
            status: CellStatus::Live,
        };
        let json = serde_json::to_value(&cell).unwrap();
        assert_eq!(json["outPoint"]["txHash"], "0xbb");
        assert_eq!(json["capacity"], "100");
        assert_eq!(json["lockHash"], "0xcc");
        assert_eq!(json["status"], "live");
    }
}
