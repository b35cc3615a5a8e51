//! Candidate opportunities awaiting a risk decision.

use serde::{Deserialize, Serialize};

/// Candidate is a proposed flash-loan arbitrage that has not been executed yet.
///
/// It only lives for the duration of a validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Estimated profit in quote currency.
    pub profit: f64,
    /// Estimated gas and fee cost in quote currency.
    pub gas_cost: f64,
    /// Estimated probability of success, 0-100.
    pub success_rate: f64,
    /// Estimated price impact as a percentage (0.5 means 0.5%).
    pub price_impact: f64,
    /// Detector confidence, 0-100.
    pub confidence: f64,
    /// Size of the flash loan in quote currency.
    pub loan_amount: f64,
}

impl Candidate {
    /// Ratio of expected profit to gas cost.
    ///
    /// Follows IEEE semantics: zero gas yields infinity (or NaN for zero profit).
    pub fn profit_gas_ratio(&self) -> f64 {
        self.profit / self.gas_cost
    }
}
