//! Tests for feature gating functionality
//!
//! The SQLite cell store is only exported with the `storage` feature; the
//! in-memory store and the services are always available.

#[cfg(feature = "storage")]
mod storage_feature_tests {
    use lightweight_cell_libs::storage::{CellStorage, SqliteCellStorage, SqlitePerformanceConfig};

    #[tokio::test]
    async fn test_sqlite_store_available_with_feature() {
        let storage = SqliteCellStorage::new_in_memory().await.unwrap();
        storage.initialize().await.unwrap();
        assert_eq!(storage.get_cell_count().await.unwrap(), 0);
        assert!(SqlitePerformanceConfig::default().enable_wal_mode);
    }
}

mod basic_functionality_tests {
    use std::sync::Arc;

    use lightweight_cell_libs::{cells::CellsService, storage::InMemoryCellStorage};

    #[tokio::test]
    async fn test_services_work_without_sqlite() {
        let service = CellsService::with_defaults(Arc::new(InMemoryCellStorage::new()));
        assert_eq!(service.get_balance(&[]).await.unwrap().to_string(), "0");
        assert!(service.all_key_hashes().await.unwrap().is_empty());
    }
}
