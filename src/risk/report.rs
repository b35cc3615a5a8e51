//! Risk report assembly and recommendations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::limits::RiskLimits;
use super::metrics::{RiskMetrics, kelly_position_fraction};
use crate::domain::Alert;
use crate::portfolio::PortfolioSummary;

/// Area a recommendation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Performance,
    Risk,
    Strategy,
}

impl std::fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationKind::Performance => write!(f, "performance"),
            RecommendationKind::Risk => write!(f, "risk"),
            RecommendationKind::Strategy => write!(f, "strategy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
}

/// Point-in-time risk report for display collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub timestamp: DateTime<Utc>,
    pub metrics: RiskMetrics,
    pub portfolio: PortfolioSummary,
    pub limits: RiskLimits,
    /// Suggested position size as a fraction of equity.
    pub position_fraction: f64,
    pub alerts: Vec<Alert>,
    pub recommendations: Vec<Recommendation>,
}

impl RiskReport {
    /// Builds a report; `alerts` should already be filtered to unacknowledged ones.
    pub fn generate(
        metrics: RiskMetrics,
        portfolio: PortfolioSummary,
        limits: RiskLimits,
        alerts: Vec<Alert>,
    ) -> Self {
        let recommendations = recommendations(&metrics, &portfolio);
        let position_fraction =
            kelly_position_fraction(portfolio.win_rate, portfolio.avg_win, portfolio.avg_loss);

        Self {
            timestamp: Utc::now(),
            metrics,
            portfolio,
            limits,
            position_fraction,
            alerts,
            recommendations,
        }
    }
}

/// Derives advice from the current metrics and portfolio summary.
pub fn recommendations(metrics: &RiskMetrics, portfolio: &PortfolioSummary) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if metrics.sharpe_ratio < 1.0 {
        out.push(Recommendation {
            kind: RecommendationKind::Performance,
            message: "Consider adjusting strategy parameters for better risk-adjusted returns"
                .to_string(),
        });
    }

    if metrics.max_drawdown > 15.0 {
        out.push(Recommendation {
            kind: RecommendationKind::Risk,
            message: "Reduce position sizes to minimize drawdown risk".to_string(),
        });
    }

    if portfolio.win_rate < 0.5 {
        out.push(Recommendation {
            kind: RecommendationKind::Strategy,
            message: "Review and optimize trading strategy selection criteria".to_string(),
        });
    }

    out
}
