//! SQLite implementation of TradeStorage.

use crate::domain::Trade;
use crate::storage::{StorageError, TradeStorage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// SqliteStorage implements TradeStorage using SQLite.
pub struct SqliteStorage {
    pool: Pool<Sqlite>,
}

/// SqliteStorageConfig holds SQLite storage configuration.
#[derive(Debug, Clone)]
pub struct SqliteStorageConfig {
    /// Path to the SQLite database file.
    pub path: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
}

impl Default for SqliteStorageConfig {
    fn default() -> Self {
        Self {
            path: "trades.db".to_string(),
            max_connections: 5,
        }
    }
}

impl SqliteStorage {
    /// Opens (creating if needed) the database and applies the schema.
    pub async fn new(config: SqliteStorageConfig) -> Result<Self, StorageError> {
        if let Some(parent) = Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", config.path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.migrate().await?;

        info!(path = %config.path, "SQLite trade storage initialized");
        Ok(storage)
    }

    async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trades (
                seq INTEGER PRIMARY KEY,
                profit REAL NOT NULL,
                risk_score REAL,
                executed_at TEXT NOT NULL,
                created_at TEXT DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_trades_executed_at ON trades(executed_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl TradeStorage for SqliteStorage {
    async fn save(&self, trade: &Trade) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            INSERT INTO trades (seq, profit, risk_score, executed_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(seq) DO NOTHING
            "#,
        )
        .bind(trade.seq as i64)
        .bind(trade.profit)
        .bind(trade.risk_score)
        .bind(trade.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await?;

        let saved = result.rows_affected() > 0;
        if saved {
            debug!(seq = trade.seq, profit = trade.profit, "Trade saved");
        }

        Ok(saved)
    }

    async fn get_all(&self) -> Result<Vec<Trade>, StorageError> {
        let rows = sqlx::query(
            "SELECT seq, profit, risk_score, executed_at FROM trades ORDER BY seq ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(parse_trade_row).collect()
    }

    async fn count(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM trades")
            .fetch_one(&self.pool)
            .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.pool.close().await;
        Ok(())
    }
}

fn parse_trade_row(row: &sqlx::sqlite::SqliteRow) -> Result<Trade, StorageError> {
    let seq: i64 = row.try_get("seq")?;
    let seq = u64::try_from(seq)
        .map_err(|_| StorageError::InvalidData(format!("Invalid seq: {}", seq)))?;

    let executed_at: String = row.try_get("executed_at")?;
    let timestamp = DateTime::parse_from_rfc3339(&executed_at)
        .map_err(|e| StorageError::InvalidData(format!("Invalid executed_at: {}", e)))?
        .with_timezone(&Utc);

    Ok(Trade {
        seq,
        profit: row.try_get("profit")?,
        timestamp,
        risk_score: row.try_get("risk_score")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open(dir: &TempDir) -> SqliteStorage {
        let path = dir.path().join("trades.db");
        SqliteStorage::new(SqliteStorageConfig {
            path: path.to_string_lossy().into_owned(),
            max_connections: 1,
        })
        .await
        .unwrap()
    }

    fn trade(seq: u64, profit: f64, risk_score: Option<f64>) -> Trade {
        Trade {
            seq,
            profit,
            timestamp: Utc::now(),
            risk_score,
        }
    }

    #[tokio::test]
    async fn test_save_and_load_in_order() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir).await;

        assert!(storage.save(&trade(2, -150.0, None)).await.unwrap());
        assert!(storage.save(&trade(1, 200.0, Some(72.0))).await.unwrap());

        let trades = storage.get_all().await.unwrap();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].seq, 1);
        assert_eq!(trades[0].profit, 200.0);
        assert_eq!(trades[0].risk_score, Some(72.0));
        assert_eq!(trades[1].risk_score, None);

        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_seq_is_ignored() {
        let dir = TempDir::new().unwrap();
        let storage = open(&dir).await;

        assert!(storage.save(&trade(1, 10.0, None)).await.unwrap());
        assert!(!storage.save(&trade(1, 99.0, None)).await.unwrap());

        assert_eq!(storage.count().await.unwrap(), 1);
        assert_eq!(storage.get_all().await.unwrap()[0].profit, 10.0);
    }

    #[tokio::test]
    async fn test_reopen_keeps_trades() {
        let dir = TempDir::new().unwrap();
        {
            let storage = open(&dir).await;
            storage.save(&trade(1, 5.0, None)).await.unwrap();
            storage.close().await.unwrap();
        }

        let storage = open(&dir).await;
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("nested").join("trades.db");

        let storage = SqliteStorage::new(SqliteStorageConfig {
            path: path.to_string_lossy().into_owned(),
            max_connections: 1,
        })
        .await
        .unwrap();

        assert_eq!(storage.count().await.unwrap(), 0);
        assert!(path.exists());
    }
}
