//! Storage interfaces and implementations for persisting trade records.

mod sqlite;

pub use sqlite::{SqliteStorage, SqliteStorageConfig};

use crate::domain::Trade;
use async_trait::async_trait;

/// TradeStorage defines the interface for storing realized trades.
#[async_trait]
pub trait TradeStorage: Send + Sync {
    /// Persists a trade. Returns false if a trade with the same sequence
    /// number was already stored.
    async fn save(&self, trade: &Trade) -> Result<bool, StorageError>;

    /// Retrieves every stored trade in ledger order.
    async fn get_all(&self) -> Result<Vec<Trade>, StorageError>;

    /// Returns the total number of stored trades.
    async fn count(&self) -> Result<i64, StorageError>;

    /// Closes the storage connection.
    async fn close(&self) -> Result<(), StorageError>;
}

/// StorageError represents errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
