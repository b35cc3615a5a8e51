//! Runtime statistics for the monitor.

/// Runtime statistics for the monitor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub refresh_cycles: u64,
    pub candidates_evaluated: u64,
    pub candidates_accepted: u64,
    pub candidates_rejected: u64,
    pub trades_recorded: u64,
    pub alerts_raised: u64,
    pub reports_published: u64,
    pub total_profit: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
}

impl Stats {
    pub(super) fn on_trade(&mut self, profit: f64) {
        self.trades_recorded += 1;
        self.total_profit += profit;
        self.best_trade = self.best_trade.max(profit);
        self.worst_trade = self.worst_trade.min(profit);
    }
}
