//! Configuration loading and validation for the risk engine.
//!
//! Uses serde_yaml to load YAML configuration files with support for
//! environment variable overrides for notification credentials.

mod app;
mod duration;
mod error;
mod monitor;
mod notification;
mod portfolio;
mod storage;

pub use app::AppConfig;
pub use error::ConfigError;
pub use monitor::{MarketConfig, MonitorConfig};
pub use notification::{NotificationConfig, TelegramConfig};
pub use portfolio::{MetricsConfig, PortfolioConfig};
pub use storage::StorageConfig;

use serde::Deserialize;
use std::{env, fs};

use crate::risk::{MetricsParams, RiskLimits, RiskLimitsUpdate};

/// Root configuration structure.
///
/// Only `app` is required; every other section falls back to defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and environment.
    pub app: AppConfig,
    /// Ledger starting point and loan sizing.
    #[serde(default)]
    pub portfolio: PortfolioConfig,
    /// VaR and Sharpe parameters.
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Overrides applied on top of the default risk limits.
    #[serde(default)]
    pub risk: RiskLimitsUpdate,
    /// Refresh and report intervals.
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Initial market inputs.
    #[serde(default)]
    pub market: MarketConfig,
    /// Alert channels like Telegram (optional).
    pub notification: Option<NotificationConfig>,
    /// Trade persistence (optional).
    pub storage: Option<StorageConfig>,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Loads `.env` first (if present), then the YAML file, then Telegram
    /// credentials from `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        config.load_credentials_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Risk limits: defaults with the `risk` section merged on top.
    pub fn risk_limits(&self) -> RiskLimits {
        RiskLimits::default().merged(&self.risk)
    }

    /// Parameters for metric computation.
    pub fn metrics_params(&self) -> MetricsParams {
        self.metrics.params(&self.portfolio)
    }

    fn load_credentials_from_env(&mut self) {
        if let Some(ref mut notification) = self.notification {
            if let Some(ref mut telegram) = notification.telegram {
                if telegram.enabled {
                    telegram.bot_token = env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default();
                    telegram.chat_id = env::var("TELEGRAM_CHAT_ID").unwrap_or_default();
                }
            }
        }
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        if self.portfolio.initial_equity <= 0.0 {
            return Err(ConfigError::out_of_range(
                "portfolio.initial_equity",
                "must be positive",
            ));
        }

        if self.portfolio.max_safe_loan <= 0.0 {
            return Err(ConfigError::out_of_range(
                "portfolio.max_safe_loan",
                "must be positive",
            ));
        }

        let confidence = self.metrics.var_confidence;
        if !(confidence > 0.0 && confidence < 1.0) {
            return Err(ConfigError::out_of_range(
                "metrics.var_confidence",
                "must be between 0 and 1",
            ));
        }

        if self.metrics.var_horizon <= 0.0 {
            return Err(ConfigError::out_of_range(
                "metrics.var_horizon",
                "must be positive",
            ));
        }

        let limits = self.risk_limits();

        if limits.min_profit < 0.0 {
            return Err(ConfigError::out_of_range(
                "risk.min_profit",
                "must not be negative",
            ));
        }

        if !(0.0..=10.0).contains(&limits.max_slippage) {
            return Err(ConfigError::out_of_range(
                "risk.max_slippage",
                "must be between 0% and 10%",
            ));
        }

        if limits.max_daily_trades == 0 {
            return Err(ConfigError::out_of_range(
                "risk.max_daily_trades",
                "must be positive",
            ));
        }

        if limits.min_risk_score > 100 {
            return Err(ConfigError::out_of_range(
                "risk.min_risk_score",
                "must be at most 100",
            ));
        }

        let is_production = self.app.env != "development";
        if let Some(telegram) = self
            .notification
            .as_ref()
            .and_then(|n| n.telegram.as_ref())
        {
            if is_production
                && telegram.enabled
                && (telegram.bot_token.is_empty() || telegram.chat_id.is_empty())
            {
                return Err(ConfigError::Validation(
                    "telegram credentials not found (set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID env vars)"
                        .into(),
                ));
            }
        }

        if let Some(ref storage) = self.storage {
            if storage.enabled && storage.path.as_deref().is_none_or(str::is_empty) {
                return Err(ConfigError::Validation(
                    "storage.path is required when storage is enabled".into(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
