use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::{
    errors::WalletResult,
    storage::{CellStorage, StoredCell},
};

/// Collect the distinct key hashes (blake160s) referenced by every recorded cell.
///
/// Cells of all statuses are scanned. The key hash is the first lock argument;
/// cells without a lock, with an empty argument list or with an empty first
/// argument are skipped.
pub async fn all_key_hashes(storage: &dyn CellStorage) -> WalletResult<BTreeSet<String>> {
    let cells = storage.get_all_cells().await?;
    let key_hashes = extract_key_hashes(&cells);
    debug!(
        cells = cells.len(),
        key_hashes = key_hashes.len(),
        "Extracted key hashes"
    );
    Ok(key_hashes)
}

pub fn extract_key_hashes(cells: &[StoredCell]) -> BTreeSet<String> {
    cells
        .iter()
        .filter_map(|cell| {
            let key_hash = cell.key_hash();
            if key_hash.is_none() {
                trace!(out_point = %cell.out_point(), "Skipping cell without lock args");
            }
            key_hash
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data_structures::{Capacity, OutPoint, Script, ScriptHashType},
        hex_utils::to_prefixed_hex,
        storage::InMemoryCellStorage,
    };

    fn cell(tx: &str, args: Vec<String>) -> StoredCell {
        let lock = Script::new(to_prefixed_hex([6u8; 32]), ScriptHashType::Type, args);
        StoredCell::new_live(OutPoint::new(tx, 0), Capacity::from(61u64), lock).unwrap()
    }

    #[tokio::test]
    async fn test_deduplicates_and_skips_malformed() {
        let alice = to_prefixed_hex([0xa1u8; 20]);
        let bob = to_prefixed_hex([0xb0u8; 20]);

        let mut no_lock = cell("0x05", vec![alice.clone()]);
        no_lock.lock = None;
        let empty_first_arg = cell("0x06", vec![String::new()]);

        let storage = InMemoryCellStorage::new();
        storage
            .save_cells(&[
                cell("0x01", vec![alice.clone()]),
                cell("0x02", vec![alice.clone(), bob.clone()]),
                cell("0x03", vec![bob.clone()]),
                cell("0x04", vec![]),
                no_lock,
                empty_first_arg,
            ])
            .await
            .unwrap();

        let key_hashes = all_key_hashes(&storage).await.unwrap();
        assert_eq!(key_hashes, BTreeSet::from([alice, bob]));
    }

    #[test]
    fn test_empty_first_arg_is_skipped() {
        let cells = vec![cell("0x01", vec![String::new()])];
        assert!(extract_key_hashes(&cells).is_empty());
    }

    #[tokio::test]
    async fn test_includes_dead_cells() {
        let carol = to_prefixed_hex([0xc0u8; 20]);
        let spent = cell("0x01", vec![carol.clone()]);

        let storage = InMemoryCellStorage::new();
        storage.save_cell(&spent).await.unwrap();
        storage.mark_cell_dead(&spent.out_point()).await.unwrap();

        let key_hashes = all_key_hashes(&storage).await.unwrap();
        assert!(key_hashes.contains(&carol));
    }

    #[test]
    fn test_empty_store() {
        assert!(extract_key_hashes(&[]).is_empty());
    }
}
