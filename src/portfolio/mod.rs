//! Portfolio ledger: the append-only trade log and its equity curve.
//!
//! The ledger is the only owner of trade history. Risk metrics, limit checks
//! and alert scans read it by reference and never mutate it.

mod summary;

pub use summary::PortfolioSummary;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use crate::domain::Trade;

/// Starting equity used when none is configured.
pub const DEFAULT_INITIAL_EQUITY: f64 = 10_000.0;

/// Risk score assumed for trades recorded without one.
pub const NEUTRAL_RISK_SCORE: f64 = 50.0;

/// PortfolioLedger records realized trades and tracks running equity.
///
/// Invariant: `equity[i] == equity[i - 1] + trades[i - 1].profit` for every
/// point after the initial one.
#[derive(Debug, Clone)]
pub struct PortfolioLedger {
    initial_equity: f64,
    trades: Vec<Trade>,
    equity: Vec<f64>,
    current_exposure: f64,
    daily_trade_count: u32,
    last_reset_date: NaiveDate,
    consecutive_losses: u32,
}

impl Default for PortfolioLedger {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_EQUITY)
    }
}

impl PortfolioLedger {
    /// Creates an empty ledger starting at the given equity.
    pub fn new(initial_equity: f64) -> Self {
        Self {
            initial_equity,
            trades: Vec::new(),
            equity: vec![initial_equity],
            current_exposure: 0.0,
            daily_trade_count: 0,
            last_reset_date: Utc::now().date_naive(),
            consecutive_losses: 0,
        }
    }

    /// Records a trade executed now without a risk score.
    pub fn record_trade(&mut self, profit: f64) -> &Trade {
        self.record_trade_at(profit, None, Utc::now())
    }

    /// Records a trade executed at the given time.
    ///
    /// The daily counter restarts when `at` falls on a different UTC calendar
    /// day than the last reset, before the new trade is counted.
    pub fn record_trade_at(
        &mut self,
        profit: f64,
        risk_score: Option<f64>,
        at: DateTime<Utc>,
    ) -> &Trade {
        let seq = self.last_seq() + 1;
        self.append(seq, profit, risk_score, at)
    }

    fn append(
        &mut self,
        seq: u64,
        profit: f64,
        risk_score: Option<f64>,
        at: DateTime<Utc>,
    ) -> &Trade {
        let today = at.date_naive();
        if today != self.last_reset_date {
            self.daily_trade_count = 0;
            self.last_reset_date = today;
        }
        self.daily_trade_count += 1;

        if profit < 0.0 {
            self.consecutive_losses += 1;
        } else {
            self.consecutive_losses = 0;
        }

        let equity = self.current_equity() + profit;
        self.equity.push(equity);
        self.trades.push(Trade {
            seq,
            profit,
            timestamp: at,
            risk_score,
        });

        debug!(
            seq = seq,
            profit = profit,
            equity = equity,
            daily_trades = self.daily_trade_count,
            consecutive_losses = self.consecutive_losses,
            "Trade recorded"
        );

        &self.trades[self.trades.len() - 1]
    }

    /// Replays previously persisted trades in order, keeping their sequence
    /// numbers. Later trades are numbered from the highest restored seq.
    pub fn restore<I>(&mut self, trades: I)
    where
        I: IntoIterator<Item = Trade>,
    {
        for trade in trades {
            self.append(trade.seq, trade.profit, trade.risk_score, trade.timestamp);
        }
    }

    /// Sequence number of the newest trade, 0 for an empty ledger.
    pub fn last_seq(&self) -> u64 {
        self.trades.iter().map(|t| t.seq).max().unwrap_or(0)
    }

    /// Per-trade returns: `(e[i] - e[i-1]) / e[i-1]` for each adjacent pair.
    pub fn historical_returns(&self) -> Vec<f64> {
        self.equity
            .windows(2)
            .map(|pair| (pair[1] - pair[0]) / pair[0])
            .collect()
    }

    /// Returns aggregate statistics over all recorded trades.
    pub fn summary(&self) -> PortfolioSummary {
        PortfolioSummary::from_ledger(self)
    }

    /// Commits a loan amount to an in-flight execution.
    pub fn reserve_exposure(&mut self, amount: f64) {
        self.current_exposure += amount;
    }

    /// Releases a previously reserved loan amount. Never goes below zero.
    pub fn release_exposure(&mut self, amount: f64) {
        self.current_exposure = (self.current_exposure - amount).max(0.0);
    }

    /// Mean execution risk score; neutral when no trades exist.
    pub fn average_risk_score(&self) -> f64 {
        if self.trades.is_empty() {
            return NEUTRAL_RISK_SCORE;
        }
        let total: f64 = self
            .trades
            .iter()
            .map(|t| t.risk_score.unwrap_or(NEUTRAL_RISK_SCORE))
            .sum();
        total / self.trades.len() as f64
    }

    /// Fraction of trades with a strictly positive profit.
    pub fn win_rate(&self) -> f64 {
        if self.trades.is_empty() {
            return 0.0;
        }
        let wins = self.trades.iter().filter(|t| t.is_win()).count();
        wins as f64 / self.trades.len() as f64
    }

    /// Trades counted today (UTC).
    pub fn daily_trade_count(&self) -> u32 {
        self.daily_trade_count_on(Utc::now().date_naive())
    }

    /// Trades counted on the given day. A day other than the last reset date
    /// has not seen any trades yet.
    pub fn daily_trade_count_on(&self, date: NaiveDate) -> u32 {
        if date == self.last_reset_date {
            self.daily_trade_count
        } else {
            0
        }
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn equity_curve(&self) -> &[f64] {
        &self.equity
    }

    pub fn initial_equity(&self) -> f64 {
        self.initial_equity
    }

    pub fn current_equity(&self) -> f64 {
        self.equity
            .last()
            .copied()
            .unwrap_or(self.initial_equity)
    }

    pub fn current_exposure(&self) -> f64 {
        self.current_exposure
    }

    pub fn consecutive_losses(&self) -> u32 {
        self.consecutive_losses
    }
}
