//! Realized trade records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade is a completed execution recorded in the portfolio ledger.
///
/// Trades are immutable once recorded: the ledger only appends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Position of this trade in the ledger, starting at 1.
    pub seq: u64,
    /// Realized profit or loss in quote currency (negative for a loss).
    pub profit: f64,
    /// When the trade was executed.
    pub timestamp: DateTime<Utc>,
    /// Risk score the candidate had when it was executed (0-100).
    pub risk_score: Option<f64>,
}

impl Trade {
    /// Returns true if the trade made money.
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }

    /// Returns true if the trade lost money.
    pub fn is_loss(&self) -> bool {
        self.profit < 0.0
    }
}
