//! Risk limits and candidate validation.

use serde::{Deserialize, Serialize};

use super::metrics::{raw_risk_score, risk_adjusted_return};
use crate::domain::Candidate;
use crate::portfolio::PortfolioLedger;

/// Thresholds a candidate must satisfy before it may be executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Minimum expected profit.
    pub min_profit: f64,
    /// Maximum gas cost.
    pub max_gas: f64,
    /// Maximum total loan amount committed at once.
    pub max_exposure: f64,
    /// Maximum number of trades per UTC day.
    pub max_daily_trades: u32,
    /// Minimum acceptable candidate risk score.
    pub min_risk_score: u8,
    /// Maximum slippage in percent.
    pub max_slippage: f64,
    /// Maximum drawdown in percent.
    pub max_drawdown: f64,
    /// Per-trade stop loss as a fraction (0.05 for 5%).
    pub stop_loss: f64,
    /// Per-trade take profit as a fraction (0.20 for 20%).
    pub take_profit: f64,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            min_profit: 100.0,
            max_gas: 150.0,
            max_exposure: 1_000_000.0,
            max_daily_trades: 50,
            min_risk_score: 30,
            max_slippage: 1.0,
            max_drawdown: 25.0,
            stop_loss: 0.05,
            take_profit: 0.20,
        }
    }
}

/// Partial update of [`RiskLimits`]; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskLimitsUpdate {
    pub min_profit: Option<f64>,
    pub max_gas: Option<f64>,
    pub max_exposure: Option<f64>,
    pub max_daily_trades: Option<u32>,
    pub min_risk_score: Option<u8>,
    pub max_slippage: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

impl RiskLimits {
    /// Overwrites every field set in `update`.
    pub fn update(&mut self, update: &RiskLimitsUpdate) {
        fn merge<T: Copy>(target: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *target = v;
            }
        }

        merge(&mut self.min_profit, update.min_profit);
        merge(&mut self.max_gas, update.max_gas);
        merge(&mut self.max_exposure, update.max_exposure);
        merge(&mut self.max_daily_trades, update.max_daily_trades);
        merge(&mut self.min_risk_score, update.min_risk_score);
        merge(&mut self.max_slippage, update.max_slippage);
        merge(&mut self.max_drawdown, update.max_drawdown);
        merge(&mut self.stop_loss, update.stop_loss);
        merge(&mut self.take_profit, update.take_profit);
    }

    /// Returns a copy with `update` applied.
    pub fn merged(mut self, update: &RiskLimitsUpdate) -> Self {
        self.update(update);
        self
    }
}

/// Outcome of validating a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    /// True iff there are no violations.
    pub accepted: bool,
    /// Human-readable reasons for rejection, in check order.
    pub violations: Vec<String>,
    pub risk_score: u8,
    /// Expected profit discounted by the candidate's residual risk.
    pub adjusted_profit: f64,
}

/// Runs every limit check against the candidate; checks never short-circuit.
pub fn validate(
    candidate: &Candidate,
    limits: &RiskLimits,
    ledger: &PortfolioLedger,
    market_risk: f64,
    max_safe_loan: f64,
) -> Validation {
    let mut violations = Vec::new();

    if candidate.profit < limits.min_profit {
        violations.push(format!(
            "Profit {} below minimum {}",
            candidate.profit, limits.min_profit
        ));
    }

    if candidate.gas_cost > limits.max_gas {
        violations.push(format!(
            "Gas cost {} exceeds maximum {}",
            candidate.gas_cost, limits.max_gas
        ));
    }

    let raw_score = raw_risk_score(candidate, market_risk, max_safe_loan);
    if raw_score < f64::from(limits.min_risk_score) {
        violations.push(format!(
            "Risk score {:.2} below minimum {}",
            raw_score, limits.min_risk_score
        ));
    }
    let score = raw_score.round() as u8;

    if ledger.daily_trade_count() >= limits.max_daily_trades {
        violations.push(format!(
            "Daily trade limit reached ({})",
            limits.max_daily_trades
        ));
    }

    if ledger.current_exposure() + candidate.loan_amount > limits.max_exposure {
        violations.push(format!(
            "Would exceed maximum exposure of {}",
            limits.max_exposure
        ));
    }

    Validation {
        accepted: violations.is_empty(),
        violations,
        risk_score: score,
        adjusted_profit: risk_adjusted_return(candidate.profit, 100.0 - f64::from(score)),
    }
}
