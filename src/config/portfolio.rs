//! Portfolio and metric calculation settings.

use serde::Deserialize;

use crate::portfolio::DEFAULT_INITIAL_EQUITY;
use crate::risk::MetricsParams;

/// Portfolio ledger settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioConfig {
    /// Equity the ledger starts from.
    #[serde(default = "default_initial_equity")]
    pub initial_equity: f64,
    /// Loan size at which loan-size risk saturates.
    #[serde(default = "default_max_safe_loan")]
    pub max_safe_loan: f64,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            initial_equity: default_initial_equity(),
            max_safe_loan: default_max_safe_loan(),
        }
    }
}

/// Parameters of the aggregate risk metrics.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// VaR confidence level in (0, 1).
    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,
    /// VaR horizon in periods.
    #[serde(default = "default_var_horizon")]
    pub var_horizon: f64,
    /// Risk-free rate used by the Sharpe ratio.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            var_confidence: default_var_confidence(),
            var_horizon: default_var_horizon(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

impl MetricsConfig {
    /// Combines metric settings with the portfolio's safe loan size.
    pub fn params(&self, portfolio: &PortfolioConfig) -> MetricsParams {
        MetricsParams {
            var_confidence: self.var_confidence,
            var_horizon: self.var_horizon,
            risk_free_rate: self.risk_free_rate,
            max_safe_loan: portfolio.max_safe_loan,
        }
    }
}

fn default_initial_equity() -> f64 {
    DEFAULT_INITIAL_EQUITY
}

fn default_max_safe_loan() -> f64 {
    MetricsParams::default().max_safe_loan
}

fn default_var_confidence() -> f64 {
    MetricsParams::default().var_confidence
}

fn default_var_horizon() -> f64 {
    MetricsParams::default().var_horizon
}

fn default_risk_free_rate() -> f64 {
    MetricsParams::default().risk_free_rate
}
