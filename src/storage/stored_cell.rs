use serde::{Deserialize, Serialize};

use crate::{
    data_structures::{Capacity, Cell, Input, OutPoint, Script},
    errors::{WalletError, WalletResult},
};

use super::cell_status::CellStatus;

/// A cell record as persisted by the sync process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCell {
    /// Database primary key; also the store's natural return order
    pub id: Option<u32>,

    // Identity
    pub out_point_tx_hash: String,
    pub out_point_index: u32,

    /// Decimal string, never a float
    pub capacity: String,

    // Lock script; absent on records written without script data
    pub lock: Option<Script>,
    pub lock_hash: String,

    pub status: CellStatus,
}

impl StoredCell {
    /// Create a live cell record, deriving `lock_hash` from the lock script
    pub fn new_live(out_point: OutPoint, capacity: Capacity, lock: Script) -> WalletResult<Self> {
        let lock_hash = lock.compute_hash()?;
        Ok(Self {
            id: None,
            out_point_tx_hash: out_point.tx_hash,
            out_point_index: out_point.index,
            capacity: capacity.to_string(),
            lock: Some(lock),
            lock_hash,
            status: CellStatus::Live,
        })
    }

    pub fn out_point(&self) -> OutPoint {
        OutPoint::new(self.out_point_tx_hash.clone(), self.out_point_index)
    }

    /// Parse the persisted capacity
    pub fn capacity(&self) -> WalletResult<Capacity> {
        Capacity::from_dec_str(&self.capacity).map_err(|e| {
            WalletError::ConversionError(format!(
                "Cell {} has invalid capacity: {e}",
                self.out_point()
            ))
        })
    }

    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// Key hash carried by the lock's first argument, if the record has one.
    /// An empty first argument is treated as absent.
    pub fn key_hash(&self) -> Option<&str> {
        self.lock
            .as_ref()
            .and_then(Script::first_arg)
            .filter(|arg| !arg.is_empty())
    }

    /// External-facing representation
    pub fn to_cell(&self) -> WalletResult<Cell> {
        Ok(Cell {
            out_point: self.out_point(),
            capacity: self.capacity()?,
            lock: self.lock.clone(),
            lock_hash: self.lock_hash.clone(),
            status: self.status,
        })
    }

    /// Input spending this cell, with a copy of its lock
    pub fn to_input(&self) -> Input {
        Input::new(self.out_point(), self.lock.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data_structures::ScriptHashType, hex_utils::to_prefixed_hex};

    fn lock(arg: &str) -> Script {
        Script::new(
            to_prefixed_hex([9u8; 32]),
            ScriptHashType::Type,
            vec![arg.to_string()],
        )
    }

    #[test]
    fn test_new_live_derives_lock_hash() {
        let script = lock("0x36c329ed630d6ce750712a477543672adab57f4c");
        let cell =
            StoredCell::new_live(OutPoint::new("0x01", 0), Capacity::from(61u64), script.clone())
                .unwrap();
        assert_eq!(cell.lock_hash, script.compute_hash().unwrap());
        assert_eq!(cell.capacity, "61");
        assert!(cell.is_live());
        assert_eq!(
            cell.key_hash(),
            Some("0x36c329ed630d6ce750712a477543672adab57f4c")
        );
    }

    #[test]
    fn test_to_input_copies_lock() {
        let cell =
            StoredCell::new_live(OutPoint::new("0x02", 3), Capacity::from(80u64), lock("0x01"))
                .unwrap();
        let input = cell.to_input();
        assert_eq!(input.previous_output, OutPoint::new("0x02", 3));
        assert_eq!(input.since, "0");
        assert_eq!(input.lock, cell.lock);
    }

    #[test]
    fn test_invalid_capacity_is_conversion_error() {
        let mut cell =
            StoredCell::new_live(OutPoint::new("0x03", 0), Capacity::from(1u64), lock("0x01"))
                .unwrap();
        cell.capacity = "1.5".to_string();
        assert!(matches!(
            cell.to_cell(),
            Err(WalletError::ConversionError(_))
        ));
    }

    #[test]
    fn test_key_hash_absent_without_args() {
        let mut cell =
            StoredCell::new_live(OutPoint::new("0x04", 0), Capacity::from(1u64), lock("0x01"))
                .unwrap();
        cell.lock.as_mut().unwrap().args.clear();
        assert_eq!(cell.key_hash(), None);
        cell.lock = None;
        assert_eq!(cell.key_hash(), None);
    }
}
