//! Monitor error types.

use crate::config::ConfigError;
use crate::risk::MarketError;
use crate::storage::StorageError;

/// Monitor error type.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("monitor is already running")]
    AlreadyRunning,
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("market data error: {0}")]
    Market(#[from] MarketError),
}
