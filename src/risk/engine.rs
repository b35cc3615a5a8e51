//! Risk engine: limits, metrics snapshot and alert book in one place.

use tracing::{debug, info};

use super::alerts::AlertBook;
use super::limits::{RiskLimits, RiskLimitsUpdate, Validation, validate};
use super::metrics::{MetricsParams, RiskMetrics, market_risk_factor};
use super::report::RiskReport;
use crate::domain::{Alert, Candidate};
use crate::portfolio::PortfolioLedger;

/// RiskEngine evaluates candidates and monitors a ledger it does not own.
#[derive(Debug)]
pub struct RiskEngine {
    limits: RiskLimits,
    params: MetricsParams,
    metrics: RiskMetrics,
    alerts: AlertBook,
}

impl RiskEngine {
    pub fn new(limits: RiskLimits, params: MetricsParams) -> Self {
        info!(
            min_profit = limits.min_profit,
            max_gas = limits.max_gas,
            max_exposure = limits.max_exposure,
            max_daily_trades = limits.max_daily_trades,
            min_risk_score = limits.min_risk_score,
            "Risk engine initialized"
        );

        Self {
            limits,
            params,
            metrics: RiskMetrics::default(),
            alerts: AlertBook::new(),
        }
    }

    /// Validates a candidate against the current limits and ledger state.
    pub fn validate(
        &self,
        candidate: &Candidate,
        ledger: &PortfolioLedger,
        volatility: f64,
    ) -> Validation {
        let validation = validate(
            candidate,
            &self.limits,
            ledger,
            market_risk_factor(volatility),
            self.params.max_safe_loan,
        );

        debug!(
            accepted = validation.accepted,
            risk_score = validation.risk_score,
            violations = validation.violations.len(),
            "Candidate validated"
        );

        validation
    }

    /// Recomputes metrics from the ledger, then scans for alerts.
    ///
    /// Returns the fresh metrics and the alerts raised by this scan.
    pub fn update_metrics(
        &mut self,
        ledger: &PortfolioLedger,
        volatility: f64,
    ) -> (RiskMetrics, Vec<Alert>) {
        self.metrics = RiskMetrics::compute(ledger, &self.params);
        let raised = self
            .alerts
            .scan(&self.metrics, ledger, &self.limits, volatility);
        (self.metrics, raised)
    }

    /// Builds a report from the last computed metrics.
    pub fn report(&self, ledger: &PortfolioLedger) -> RiskReport {
        RiskReport::generate(
            self.metrics,
            ledger.summary(),
            self.limits.clone(),
            self.alerts.unacknowledged(),
        )
    }

    /// Merges a partial limits update; unspecified fields are kept.
    pub fn update_limits(&mut self, update: &RiskLimitsUpdate) {
        self.limits.update(update);
        info!(limits = ?self.limits, "Risk limits updated");
    }

    pub fn acknowledge_alert(&mut self, id: u64) -> bool {
        self.alerts.acknowledge(id)
    }

    pub fn clear_alerts(&mut self) {
        self.alerts.clear();
    }

    pub fn alerts(&self) -> &[Alert] {
        self.alerts.all()
    }

    pub fn metrics(&self) -> RiskMetrics {
        self.metrics
    }

    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    pub fn params(&self) -> &MetricsParams {
        &self.params
    }
}
