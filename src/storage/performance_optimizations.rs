//! SQLite connection tuning for the cell store
//!
//! The cell services are read-heavy: balance and selection queries run far
//! more often than the sync process writes. These presets favour concurrent
//! readers.

#[cfg(feature = "storage")]
use crate::errors::{WalletError, WalletResult};
#[cfg(feature = "storage")]
use tokio_rusqlite::Connection;

/// SQLite configuration applied when a cell store connection is opened
#[cfg(feature = "storage")]
#[derive(Debug, Clone)]
pub struct SqlitePerformanceConfig {
    /// Enable WAL (Write-Ahead Logging) mode so readers don't block the writer
    pub enable_wal_mode: bool,
    /// Set synchronous mode (0=OFF, 1=NORMAL, 2=FULL)
    pub synchronous_mode: u8,
    /// Cache size in KB
    pub cache_size_kb: i32,
    /// Temporary storage mode (0=default, 1=file, 2=memory)
    pub temp_store: u8,
    /// Busy timeout in milliseconds
    pub busy_timeout_ms: u32,
}

#[cfg(feature = "storage")]
impl Default for SqlitePerformanceConfig {
    fn default() -> Self {
        Self::production_optimized()
    }
}

#[cfg(feature = "storage")]
impl SqlitePerformanceConfig {
    /// Production-safe settings for an on-disk cell store
    pub fn production_optimized() -> Self {
        Self {
            enable_wal_mode: true,
            synchronous_mode: 1,   // NORMAL
            cache_size_kb: 32_000, // 32MB
            temp_store: 2,         // Memory
            busy_timeout_ms: 5000,
        }
    }

    /// Settings for `:memory:` databases, where WAL is unavailable
    pub fn in_memory() -> Self {
        Self {
            enable_wal_mode: false,
            synchronous_mode: 0,
            cache_size_kb: 8_000,
            temp_store: 2,
            busy_timeout_ms: 1000,
        }
    }

    /// Apply performance configuration to SQLite connection
    pub async fn apply_to_connection(&self, connection: &Connection) -> WalletResult<()> {
        let config = self.clone();
        connection
            .call(move |conn| {
                if config.enable_wal_mode {
                    conn.pragma_update(None, "journal_mode", "WAL")?;
                }
                conn.pragma_update(None, "synchronous", config.synchronous_mode)?;
                // Negative = KB directly
                conn.pragma_update(None, "cache_size", -config.cache_size_kb)?;
                conn.pragma_update(None, "temp_store", config.temp_store)?;
                conn.busy_timeout(std::time::Duration::from_millis(
                    config.busy_timeout_ms as u64,
                ))?;
                Ok(())
            })
            .await
            .map_err(|e| {
                WalletError::StorageError(format!("Failed to apply SQLite configuration: {e}"))
            })
    }
}
