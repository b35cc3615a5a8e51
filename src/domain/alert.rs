//! Risk alerts raised by the monitoring scan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// AlertKind identifies which risk condition was breached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Maximum drawdown exceeded its threshold.
    Drawdown,
    /// Current exposure is close to the configured maximum.
    Exposure,
    /// Market volatility is high.
    Volatility,
    /// Too many losing trades in a row.
    Losses,
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertKind::Drawdown => write!(f, "drawdown"),
            AlertKind::Exposure => write!(f, "exposure"),
            AlertKind::Volatility => write!(f, "volatility"),
            AlertKind::Losses => write!(f, "losses"),
        }
    }
}

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Alert is a single threshold breach.
///
/// Only the `acknowledged` flag changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Identifier unique within the alert book that created it.
    pub id: u64,
    /// Breached condition.
    #[serde(rename = "type")]
    pub kind: AlertKind,
    /// Human-readable description including the offending value.
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
    pub acknowledged: bool,
}
