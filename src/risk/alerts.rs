//! Threshold alerts over current risk metrics.

use chrono::Utc;
use tracing::debug;

use super::limits::RiskLimits;
use super::metrics::RiskMetrics;
use crate::domain::{Alert, AlertKind, Severity};
use crate::portfolio::PortfolioLedger;

/// Drawdown (percent) above which an alert is raised.
pub const DRAWDOWN_ALERT_THRESHOLD: f64 = 20.0;
/// Share of maximum exposure above which an alert is raised.
pub const EXPOSURE_ALERT_RATIO: f64 = 0.8;
/// Volatility index above which an alert is raised.
pub const VOLATILITY_ALERT_THRESHOLD: f64 = 50.0;
/// Consecutive losses above which an alert is raised.
pub const CONSECUTIVE_LOSS_THRESHOLD: u32 = 3;

/// AlertBook accumulates alerts until a caller clears them.
///
/// Scans do not deduplicate: a condition that persists across scans is
/// reported again on every scan.
#[derive(Debug, Default)]
pub struct AlertBook {
    alerts: Vec<Alert>,
    next_id: u64,
}

impl AlertBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every alert condition once and returns the alerts it raised.
    pub fn scan(
        &mut self,
        metrics: &RiskMetrics,
        ledger: &PortfolioLedger,
        limits: &RiskLimits,
        volatility: f64,
    ) -> Vec<Alert> {
        let mut raised = Vec::new();

        if metrics.max_drawdown > DRAWDOWN_ALERT_THRESHOLD {
            raised.push(self.raise(
                AlertKind::Drawdown,
                format!(
                    "Maximum drawdown exceeded {}%: {:.2}%",
                    DRAWDOWN_ALERT_THRESHOLD, metrics.max_drawdown
                ),
                Severity::High,
            ));
        }

        let exposure = ledger.current_exposure();
        if exposure > limits.max_exposure * EXPOSURE_ALERT_RATIO {
            raised.push(self.raise(
                AlertKind::Exposure,
                format!("Approaching maximum exposure limit: {}", exposure),
                Severity::Medium,
            ));
        }

        if volatility > VOLATILITY_ALERT_THRESHOLD {
            raised.push(self.raise(
                AlertKind::Volatility,
                format!("High market volatility detected: {:.1}", volatility),
                Severity::High,
            ));
        }

        let losses = ledger.consecutive_losses();
        if losses > CONSECUTIVE_LOSS_THRESHOLD {
            raised.push(self.raise(
                AlertKind::Losses,
                format!("{} consecutive losses detected", losses),
                Severity::High,
            ));
        }

        raised
    }

    fn raise(&mut self, kind: AlertKind, message: String, severity: Severity) -> Alert {
        self.next_id += 1;
        let alert = Alert {
            id: self.next_id,
            kind,
            message,
            severity,
            created_at: Utc::now(),
            acknowledged: false,
        };

        debug!(
            id = alert.id,
            kind = %alert.kind,
            severity = %alert.severity,
            message = %alert.message,
            "Risk alert"
        );

        self.alerts.push(alert.clone());
        alert
    }

    /// Marks an alert as acknowledged. Returns false if the id is unknown.
    pub fn acknowledge(&mut self, id: u64) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// Alerts not yet acknowledged, oldest first.
    pub fn unacknowledged(&self) -> Vec<Alert> {
        self.alerts
            .iter()
            .filter(|a| !a.acknowledged)
            .cloned()
            .collect()
    }

    pub fn all(&self) -> &[Alert] {
        &self.alerts
    }

    /// Drops every alert. Ids keep increasing across clears.
    pub fn clear(&mut self) {
        self.alerts.clear();
    }
}
