//! SQLite storage implementation for recorded cells
//!
//! This module provides a SQLite-based storage backend that implements the
//! `CellStorage` trait. Capacities are stored as decimal TEXT so that values
//! beyond the range of SQLite's 64-bit integers survive unchanged.

#[cfg(feature = "storage")]
use async_trait::async_trait;
#[cfg(feature = "storage")]
use rusqlite::{params, types::Type, Row};
#[cfg(feature = "storage")]
use std::path::Path;
#[cfg(feature = "storage")]
use tokio_rusqlite::Connection;

#[cfg(feature = "storage")]
use crate::{
    data_structures::{OutPoint, Script, ScriptHashType},
    errors::{WalletError, WalletResult},
    storage::{CellFilter, CellStatus, CellStorage, SqlitePerformanceConfig, StoredCell},
};

/// (code_hash, hash_type, args_json) columns of a cell's lock
#[cfg(feature = "storage")]
type LockColumns = (Option<String>, Option<&'static str>, Option<String>);

/// SQLite storage backend for cells
#[cfg(feature = "storage")]
pub struct SqliteCellStorage {
    connection: Connection,
}

#[cfg(feature = "storage")]
impl SqliteCellStorage {
    /// Open (or create) a cell store at `database_path`
    pub async fn new<P: AsRef<Path>>(database_path: P) -> WalletResult<Self> {
        Self::new_with_config(database_path, SqlitePerformanceConfig::production_optimized())
            .await
    }

    pub async fn new_with_config<P: AsRef<Path>>(
        database_path: P,
        performance_config: SqlitePerformanceConfig,
    ) -> WalletResult<Self> {
        let connection = Connection::open(database_path).await.map_err(|e| {
            WalletError::StorageError(format!("Failed to open SQLite database: {e}"))
        })?;
        performance_config.apply_to_connection(&connection).await?;
        Ok(Self { connection })
    }

    /// Create an in-memory SQLite storage instance (useful for testing)
    pub async fn new_in_memory() -> WalletResult<Self> {
        let connection = Connection::open(":memory:").await.map_err(|e| {
            WalletError::StorageError(format!("Failed to create in-memory database: {e}"))
        })?;
        SqlitePerformanceConfig::in_memory()
            .apply_to_connection(&connection)
            .await?;
        Ok(Self { connection })
    }

    /// Create the database schema
    async fn create_schema(&self) -> WalletResult<()> {
        let sql = r#"
            CREATE TABLE IF NOT EXISTS cells (
                id INTEGER PRIMARY KEY AUTOINCREMENT,

                -- Identity
                out_point_tx_hash TEXT NOT NULL,
                out_point_index INTEGER NOT NULL,

                -- Decimal string, arbitrary precision
                capacity TEXT NOT NULL,

                -- Lock script (NULL when the record carries no script data)
                lock_code_hash TEXT,
                lock_hash_type TEXT,
                lock_args_json TEXT,
                lock_hash TEXT NOT NULL,

                status TEXT NOT NULL DEFAULT 'live' CHECK (status IN ('live', 'dead')),

                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,

                UNIQUE(out_point_tx_hash, out_point_index)
            );

            CREATE INDEX IF NOT EXISTS idx_cells_lock_hash_status ON cells(lock_hash, status);
            CREATE INDEX IF NOT EXISTS idx_cells_status ON cells(status);
        "#;

        self.connection
            .call(move |conn| {
                conn.execute_batch(sql)?;
                Ok(())
            })
            .await
            .map_err(|e| WalletError::StorageError(format!("Failed to create schema: {e}")))
    }

    fn conversion_error(column: usize, error: WalletError) -> rusqlite::Error {
        rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(error))
    }

    fn to_u32(value: i64, column: usize) -> rusqlite::Result<u32> {
        u32::try_from(value).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, Type::Integer, Box::new(e))
        })
    }

    /// Convert a database row to a StoredCell
    fn row_to_cell(row: &Row) -> rusqlite::Result<StoredCell> {
        let code_hash: Option<String> = row.get("lock_code_hash")?;
        let lock = match code_hash {
            Some(code_hash) => {
                let hash_type: String = row.get("lock_hash_type")?;
                let hash_type = ScriptHashType::try_from(hash_type.as_str())
                    .map_err(|e| Self::conversion_error(5, e))?;
                let args = match row.get::<_, Option<String>>("lock_args_json")? {
                    Some(json) => serde_json::from_str::<Vec<String>>(&json).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e))
                    })?,
                    None => Vec::new(),
                };
                Some(Script::new(code_hash, hash_type, args))
            }
            None => None,
        };

        let status: String = row.get("status")?;
        let status = status
            .parse::<CellStatus>()
            .map_err(|e| Self::conversion_error(8, e))?;

        Ok(StoredCell {
            id: Some(Self::to_u32(row.get("id")?, 0)?),
            out_point_tx_hash: row.get("out_point_tx_hash")?,
            out_point_index: Self::to_u32(row.get("out_point_index")?, 2)?,
            capacity: row.get("capacity")?,
            lock,
            lock_hash: row.get("lock_hash")?,
            status,
        })
    }

    /// Build WHERE clause and parameters from filter
    fn build_filter_clause(
        filter: &CellFilter,
    ) -> (String, Vec<Box<dyn rusqlite::ToSql + Send>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql + Send>> = Vec::new();

        if let Some(ref lock_hashes) = filter.lock_hashes {
            if lock_hashes.is_empty() {
                // IN () is not valid SQL; an empty set matches nothing
                conditions.push("0".to_string());
            } else {
                let placeholders = vec!["?"; lock_hashes.len()].join(", ");
                conditions.push(format!("lock_hash IN ({placeholders})"));
                for hash in lock_hashes {
                    params.push(Box::new(hash.clone()));
                }
            }
        }

        if let Some(status) = filter.status {
            conditions.push("status = ?".to_string());
            params.push(Box::new(status.as_str()));
        }

        if let Some(ref out_point) = filter.out_point {
            conditions.push("out_point_tx_hash = ?".to_string());
            conditions.push("out_point_index = ?".to_string());
            params.push(Box::new(out_point.tx_hash.clone()));
            params.push(Box::new(out_point.index as i64));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    fn lock_columns(cell: &StoredCell) -> WalletResult<LockColumns> {
        match cell.lock {
            Some(ref lock) => {
                let args_json = serde_json::to_string(&lock.args).map_err(|e| {
                    WalletError::ConversionError(format!("Failed to encode lock args: {e}"))
                })?;
                Ok((
                    Some(lock.code_hash.clone()),
                    Some(lock.hash_type.as_str()),
                    Some(args_json),
                ))
            }
            None => Ok((None, None, None)),
        }
    }

    fn upsert(
        conn: &rusqlite::Connection,
        cell: &StoredCell,
        lock_columns: &LockColumns,
    ) -> rusqlite::Result<u32> {
        let (code_hash, hash_type, args_json) = lock_columns;
        if let Some(cell_id) = cell.id {
            let rows_affected = conn.execute(
                r#"
                UPDATE cells
                SET out_point_tx_hash = ?, out_point_index = ?, capacity = ?,
                    lock_code_hash = ?, lock_hash_type = ?, lock_args_json = ?,
                    lock_hash = ?, status = ?, updated_at = CURRENT_TIMESTAMP
                WHERE id = ?
                "#,
                params![
                    cell.out_point_tx_hash,
                    cell.out_point_index as i64,
                    cell.capacity,
                    code_hash,
                    hash_type,
                    args_json,
                    cell.lock_hash,
                    cell.status.as_str(),
                    cell_id as i64,
                ],
            )?;
            if rows_affected == 0 {
                return Err(rusqlite::Error::QueryReturnedNoRows);
            }
            Ok(cell_id)
        } else {
            conn.execute(
                r#"
                INSERT INTO cells
                (out_point_tx_hash, out_point_index, capacity, lock_code_hash,
                 lock_hash_type, lock_args_json, lock_hash, status)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    cell.out_point_tx_hash,
                    cell.out_point_index as i64,
                    cell.capacity,
                    code_hash,
                    hash_type,
                    args_json,
                    cell.lock_hash,
                    cell.status.as_str(),
                ],
            )?;
            Self::to_u32(conn.last_insert_rowid(), 0)
        }
    }
}

#[cfg(feature = "storage")]
#[async_trait]
impl CellStorage for SqliteCellStorage {
    async fn initialize(&self) -> WalletResult<()> {
        self.create_schema().await
    }

    async fn get_cells(&self, filter: Option<CellFilter>) -> WalletResult<Vec<StoredCell>> {
        self.connection
            .call(move |conn| {
                let mut query = "SELECT * FROM cells".to_string();
                let mut params_values: Vec<Box<dyn rusqlite::ToSql + Send>> = Vec::new();

                if let Some(ref filter) = filter {
                    let (where_clause, filter_params) = Self::build_filter_clause(filter);
                    if !where_clause.is_empty() {
                        query.push(' ');
                        query.push_str(&where_clause);
                        params_values.extend(filter_params);
                    }
                }

                // Store order: insertion order
                query.push_str(" ORDER BY id ASC");

                if let Some(limit) = filter.as_ref().and_then(|f| f.limit) {
                    query.push_str(&format!(" LIMIT {limit}"));
                }

                let mut stmt = conn.prepare(&query)?;
                let param_refs: Vec<&dyn rusqlite::ToSql> = params_values
                    .iter()
                    .map(|p| p.as_ref() as &dyn rusqlite::ToSql)
                    .collect();
                let rows = stmt.query_map(&param_refs[..], Self::row_to_cell)?;

                let mut cells = Vec::new();
                for row in rows {
                    cells.push(row?);
                }
                Ok(cells)
            })
            .await
            .map_err(|e| WalletError::StorageError(format!("Failed to get cells: {e}")))
    }

    async fn save_cell(&self, cell: &StoredCell) -> WalletResult<u32> {
        let cell = cell.clone();
        let lock_columns = Self::lock_columns(&cell)?;
        self.connection
            .call(move |conn| Ok(Self::upsert(conn, &cell, &lock_columns)?))
            .await
            .map_err(|e| WalletError::StorageError(format!("Failed to save cell: {e}")))
    }

    async fn save_cells(&self, cells: &[StoredCell]) -> WalletResult<Vec<u32>> {
        let rows = cells
            .iter()
            .map(|cell| -> WalletResult<_> {
                Ok((cell.clone(), Self::lock_columns(cell)?))
            })
            .collect::<WalletResult<Vec<_>>>()?;

        self.connection
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut cell_ids = Vec::with_capacity(rows.len());
                for (cell, lock_columns) in &rows {
                    cell_ids.push(Self::upsert(&tx, cell, lock_columns)?);
                }
                tx.commit()?;
                Ok(cell_ids)
            })
            .await
            .map_err(|e| WalletError::StorageError(format!("Failed to save cells: {e}")))
    }

    async fn mark_cell_dead(&self, out_point: &OutPoint) -> WalletResult<bool> {
        let out_point = out_point.clone();
        self.connection
            .call(move |conn| {
                let rows_affected = conn.execute(
                    r#"
                    UPDATE cells
                    SET status = 'dead', updated_at = CURRENT_TIMESTAMP
                    WHERE out_point_tx_hash = ? AND out_point_index = ? AND status = 'live'
                    "#,
                    params![out_point.tx_hash, out_point.index as i64],
                )?;
                Ok(rows_affected > 0)
            })
            .await
            .map_err(|e| WalletError::StorageError(format!("Failed to mark cell dead: {e}")))
    }

    async fn get_cell_count(&self) -> WalletResult<usize> {
        self.connection
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM cells", [], |row| row.get(0))?;
                Ok(count as usize)
            })
            .await
            .map_err(|e| WalletError::StorageError(format!("Failed to get cell count: {e}")))
    }

    async fn close(&self) -> WalletResult<()> {
        // tokio-rusqlite automatically handles connection cleanup on drop
        Ok(())
    }
}

#[cfg(all(test, feature = "storage"))]
mod tests {
    use super::*;
    use crate::{data_structures::Capacity, hex_utils::to_prefixed_hex};

    fn cell(tx: &str, index: u32, capacity: &str, args: Vec<&str>) -> StoredCell {
        let lock = Script::new(
            to_prefixed_hex([4u8; 32]),
            ScriptHashType::Data,
            args.into_iter().map(String::from).collect(),
        );
        StoredCell::new_live(
            OutPoint::new(tx, index),
            Capacity::from_dec_str(capacity).unwrap(),
            lock,
        )
        .unwrap()
    }

    async fn storage() -> SqliteCellStorage {
        let storage = SqliteCellStorage::new_in_memory().await.unwrap();
        storage.initialize().await.unwrap();
        storage
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_wide_capacity_and_lock() {
        let storage = storage().await;
        let original = cell(
            "0x01",
            0,
            "115792089237316195423570985008687907853269984665640564039457584007913129639935",
            vec!["0xaa", "0xbb"],
        );
        let id = storage.save_cell(&original).await.unwrap();

        let loaded = storage.get_all_cells().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, Some(id));
        assert_eq!(loaded[0].capacity, original.capacity);
        assert_eq!(loaded[0].lock, original.lock);
        assert_eq!(loaded[0].status, CellStatus::Live);
    }

    #[tokio::test]
    async fn test_missing_lock_roundtrip() {
        let storage = storage().await;
        let mut record = cell("0x02", 1, "10", vec![]);
        record.lock = None;
        storage.save_cell(&record).await.unwrap();

        let loaded = storage.get_all_cells().await.unwrap();
        assert_eq!(loaded[0].lock, None);
    }

    #[tokio::test]
    async fn test_filter_by_lock_hashes_and_status() {
        let storage = storage().await;
        let a = cell("0x0a", 0, "10", vec!["0x01"]);
        let b = cell("0x0b", 0, "20", vec!["0x02"]);
        let a_dead = cell("0x0c", 0, "30", vec!["0x01"]);
        storage
            .save_cells(&[a.clone(), b.clone(), a_dead.clone()])
            .await
            .unwrap();
        storage.mark_cell_dead(&a_dead.out_point()).await.unwrap();

        let live = storage
            .get_live_cells_by_lock_hashes(&[a.lock_hash.clone()])
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].out_point_tx_hash, "0x0a");

        let both = storage
            .get_cells(Some(CellFilter::new().with_lock_hashes(vec![
                a.lock_hash.clone(),
                b.lock_hash.clone(),
            ])))
            .await
            .unwrap();
        assert_eq!(both.len(), 3);

        let none = storage
            .get_cells(Some(CellFilter::new().with_lock_hashes(vec![])))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_out_point_rolls_back_batch() {
        let storage = storage().await;
        let result = storage
            .save_cells(&[cell("0x01", 0, "1", vec![]), cell("0x01", 0, "2", vec![])])
            .await;
        assert!(matches!(result, Err(WalletError::StorageError(_))));
        assert_eq!(storage.get_cell_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_index_is_rejected() {
        let storage = storage().await;
        storage
            .connection
            .call(|conn| {
                conn.execute(
                    "INSERT INTO cells (out_point_tx_hash, out_point_index, capacity, lock_hash) \
                     VALUES ('0x01', -1, '10', '0x00')",
                    [],
                )?;
                Ok(())
            })
            .await
            .unwrap();

        assert!(matches!(
            storage.get_all_cells().await,
            Err(WalletError::StorageError(_))
        ));
    }

    #[tokio::test]
    async fn test_update_existing_cell() {
        let storage = storage().await;
        let mut record = cell("0x01", 0, "5", vec!["0x01"]);
        record.id = Some(storage.save_cell(&record).await.unwrap());
        record.capacity = "6".to_string();
        storage.save_cell(&record).await.unwrap();

        let loaded = storage.get_all_cells().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].capacity, "6");

        record.id = Some(999);
        assert!(storage.save_cell(&record).await.is_err());
    }
}
