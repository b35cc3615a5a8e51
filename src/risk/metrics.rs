//! Risk metric formulas.
//!
//! Every function here is pure and total: empty inputs and zero denominators
//! produce 0 instead of an error.

use serde::{Deserialize, Serialize};

use crate::domain::Candidate;
use crate::portfolio::PortfolioLedger;

/// Fraction of the raw Kelly stake actually used.
pub const KELLY_SAFETY_FACTOR: f64 = 0.25;
/// Upper bound on the suggested position fraction.
pub const MAX_POSITION_FRACTION: f64 = 0.2;
/// Loan size above which loan-size risk saturates.
pub const DEFAULT_MAX_SAFE_LOAN: f64 = 1_000_000.0;

/// Parameters for aggregate metric computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsParams {
    /// VaR confidence level, e.g. 0.95.
    pub var_confidence: f64,
    /// VaR horizon in periods.
    pub var_horizon: f64,
    /// Per-period risk-free rate used by the Sharpe ratio.
    pub risk_free_rate: f64,
    /// Loan size at which loan-size risk reaches 1.0.
    pub max_safe_loan: f64,
}

impl Default for MetricsParams {
    fn default() -> Self {
        Self {
            var_confidence: 0.95,
            var_horizon: 1.0,
            risk_free_rate: 0.02,
            max_safe_loan: DEFAULT_MAX_SAFE_LOAN,
        }
    }
}

/// Aggregate risk metrics derived from a ledger snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub value_at_risk: f64,
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough decline, in percent.
    pub max_drawdown: f64,
    pub current_exposure: f64,
    /// Mean risk score of executed trades.
    pub risk_score: f64,
}

impl Default for RiskMetrics {
    fn default() -> Self {
        Self {
            value_at_risk: 0.0,
            sharpe_ratio: 0.0,
            max_drawdown: 0.0,
            current_exposure: 0.0,
            risk_score: crate::portfolio::NEUTRAL_RISK_SCORE,
        }
    }
}

impl RiskMetrics {
    /// Computes all metrics from the ledger's current state.
    pub fn compute(ledger: &PortfolioLedger, params: &MetricsParams) -> Self {
        let returns = ledger.historical_returns();

        Self {
            value_at_risk: value_at_risk(&returns, params.var_confidence, params.var_horizon),
            sharpe_ratio: sharpe_ratio(&returns, params.risk_free_rate),
            max_drawdown: max_drawdown(ledger.equity_curve()),
            current_exposure: ledger.current_exposure(),
            risk_score: ledger.average_risk_score(),
        }
    }
}

/// Historical Value-at-Risk of a return series.
///
/// Picks the return at index `floor((1 - confidence) * n)` of the ascending
/// sort and scales its magnitude by `sqrt(horizon)`.
pub fn value_at_risk(returns: &[f64], confidence: f64, horizon: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let index = ((1.0 - confidence) * sorted.len() as f64).floor();
    let tail = if index >= 0.0 {
        sorted.get(index as usize).copied().unwrap_or(0.0)
    } else {
        0.0
    };

    tail.abs() * horizon.sqrt()
}

/// Sharpe ratio using the population standard deviation.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let Some(&first) = returns.first() else {
        return 0.0;
    };
    // A constant series has zero variance, but summing it may not be exact.
    if returns.iter().all(|&r| r == first) {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    if std_dev == 0.0 {
        return 0.0;
    }

    (mean - risk_free_rate) / std_dev
}

/// Maximum drawdown of an equity curve, in percent.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let Some(&first) = equity.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut worst = 0.0_f64;

    for &value in equity {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }

    worst * 100.0
}

/// Fractional Kelly position size as a fraction of equity, in `[0, 0.2]`.
///
/// `avg_loss` is the magnitude of the average loss. Never suggests shorting.
pub fn kelly_position_fraction(win_rate: f64, avg_win: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 0.0;
    }

    let b = avg_win / avg_loss;
    if b == 0.0 {
        return 0.0;
    }

    let p = win_rate;
    let q = 1.0 - p;
    let kelly = (p * b - q) / b;

    (kelly * KELLY_SAFETY_FACTOR).clamp(0.0, MAX_POSITION_FRACTION)
}

/// Maps a volatility index to a market risk factor.
pub fn market_risk_factor(volatility: f64) -> f64 {
    if volatility > 50.0 {
        0.8
    } else if volatility > 30.0 {
        0.5
    } else {
        0.2
    }
}

/// Loan size relative to the safe maximum, capped at 1.0.
pub fn loan_size_risk(loan_amount: f64, max_safe_loan: f64) -> f64 {
    if max_safe_loan <= 0.0 {
        return 1.0;
    }
    (loan_amount / max_safe_loan).min(1.0)
}

/// Heuristic quality score of a candidate, 0 (worst) to 100 (best), rounded
/// for reporting.
pub fn risk_score(candidate: &Candidate, market_risk: f64, max_safe_loan: f64) -> u8 {
    raw_risk_score(candidate, market_risk, max_safe_loan).round() as u8
}

/// Unrounded risk score in `[0, 100]`. Limit checks compare against this.
pub fn raw_risk_score(candidate: &Candidate, market_risk: f64, max_safe_loan: f64) -> f64 {
    let mut score = 50.0;

    let ratio = candidate.profit_gas_ratio();
    if ratio > 10.0 {
        score += 20.0;
    } else if ratio > 5.0 {
        score += 10.0;
    } else if ratio < 2.0 {
        score -= 20.0;
    }

    if candidate.success_rate > 90.0 {
        score += 15.0;
    } else if candidate.success_rate > 80.0 {
        score += 5.0;
    } else if candidate.success_rate < 60.0 {
        score -= 15.0;
    }

    if candidate.price_impact < 0.1 {
        score += 10.0;
    } else if candidate.price_impact > 1.0 {
        score -= 20.0;
    }

    score += (candidate.confidence - 50.0) * 0.3;
    score -= market_risk * 10.0;
    score -= loan_size_risk(candidate.loan_amount, max_safe_loan) * 15.0;

    score.clamp(0.0, 100.0)
}

/// Scales an expected return down by a 0-100 risk figure.
pub fn risk_adjusted_return(expected_return: f64, risk: f64) -> f64 {
    expected_return * (1.0 - risk / 100.0)
}
