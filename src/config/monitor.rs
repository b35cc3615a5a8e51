//! Monitoring loop and market input settings.

use serde::Deserialize;
use std::time::Duration;

use super::duration;

/// Periodic recomputation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorConfig {
    /// Interval between metric refreshes and alert scans (default: 10s).
    #[serde(default, with = "duration")]
    pub refresh_interval: Duration,
    /// Interval between published risk reports (default: 1h).
    #[serde(default, with = "duration")]
    pub report_interval: Duration,
}

/// Market input settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketConfig {
    /// Volatility index assumed until a collaborator pushes a new one.
    #[serde(default = "default_volatility")]
    pub volatility: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            volatility: default_volatility(),
        }
    }
}

fn default_volatility() -> f64 {
    20.0
}
