//! Market condition inputs.
//!
//! The engine never invents market data. Volatility comes from a
//! [`MarketFeed`] supplied by the caller.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

/// MarketError represents failures while reading market conditions.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("market data unavailable: {0}")]
    Unavailable(String),
    #[error("invalid volatility value: {0}")]
    InvalidValue(f64),
}

/// MarketFeed supplies the current market volatility index (roughly 0-100).
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Returns the latest volatility estimate.
    async fn volatility(&self) -> Result<f64, MarketError>;
}

/// ManualFeed holds a volatility value pushed by an external collaborator.
pub struct ManualFeed {
    volatility: RwLock<f64>,
}

impl ManualFeed {
    pub fn new(initial: f64) -> Self {
        Self {
            volatility: RwLock::new(initial),
        }
    }

    /// Replaces the current volatility estimate.
    pub async fn set_volatility(&self, value: f64) -> Result<(), MarketError> {
        if !value.is_finite() || value < 0.0 {
            return Err(MarketError::InvalidValue(value));
        }
        *self.volatility.write().await = value;
        debug!(volatility = value, "Volatility updated");
        Ok(())
    }
}

#[async_trait]
impl MarketFeed for ManualFeed {
    async fn volatility(&self) -> Result<f64, MarketError> {
        Ok(*self.volatility.read().await)
    }
}
