//! Shared fixtures for integration tests

#![allow(dead_code)]

use lightweight_cell_libs::{
    data_structures::{Capacity, OutPoint, Script, ScriptHashType},
    hex_utils::to_prefixed_hex,
    storage::StoredCell,
};

/// Default secp256k1/blake160 lock owned by `owner`
pub fn owner_lock(owner: u8) -> Script {
    Script::new(
        to_prefixed_hex([0x9bu8; 32]),
        ScriptHashType::Type,
        vec![to_prefixed_hex([owner; 20])],
    )
}

pub fn lock_hash(owner: u8) -> String {
    owner_lock(owner).compute_hash().unwrap()
}

pub fn tx_hash(n: u32) -> String {
    let mut bytes = [0u8; 32];
    bytes[28..].copy_from_slice(&n.to_be_bytes());
    to_prefixed_hex(bytes)
}

/// Live cell at `(tx_hash(n), 0)` with the given capacity
pub fn live_cell(n: u32, capacity: &str, owner: u8) -> StoredCell {
    StoredCell::new_live(
        OutPoint::new(tx_hash(n), 0),
        Capacity::from_dec_str(capacity).unwrap(),
        owner_lock(owner),
    )
    .unwrap()
}
