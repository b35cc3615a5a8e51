//! Aggregate portfolio statistics.

use serde::{Deserialize, Serialize};

use super::PortfolioLedger;

/// Snapshot of ledger statistics for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_trades: usize,
    /// Winning trades as a fraction of all trades (0.0-1.0).
    pub win_rate: f64,
    pub current_equity: f64,
    /// Current equity minus initial equity.
    pub total_profit: f64,
    /// Mean profit of winning trades, 0 when there are none.
    pub avg_win: f64,
    /// Mean loss magnitude of losing trades (positive), 0 when there are none.
    pub avg_loss: f64,
    /// Largest profit, never below 0.
    pub largest_win: f64,
    /// Largest loss (negative), never above 0.
    pub largest_loss: f64,
    pub current_exposure: f64,
    pub consecutive_losses: u32,
}

impl PortfolioSummary {
    pub(super) fn from_ledger(ledger: &PortfolioLedger) -> Self {
        let trades = ledger.trades();

        let wins: Vec<f64> = trades.iter().filter(|t| t.is_win()).map(|t| t.profit).collect();
        let losses: Vec<f64> = trades.iter().filter(|t| t.is_loss()).map(|t| t.profit).collect();

        let largest_win = trades.iter().map(|t| t.profit).fold(0.0_f64, f64::max);
        let largest_loss = trades.iter().map(|t| t.profit).fold(0.0_f64, f64::min);

        Self {
            total_trades: trades.len(),
            win_rate: ledger.win_rate(),
            current_equity: ledger.current_equity(),
            total_profit: ledger.current_equity() - ledger.initial_equity(),
            avg_win: mean(&wins),
            avg_loss: mean(&losses).abs(),
            largest_win,
            largest_loss,
            current_exposure: ledger.current_exposure(),
            consecutive_losses: ledger.consecutive_losses(),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
