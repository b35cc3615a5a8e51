//! Risk assessment: metric formulas, limit validation, alerting and reports.

mod alerts;
mod engine;
mod hedging;
mod limits;
mod market;
mod metrics;
mod report;

pub use alerts::AlertBook;
pub use engine::RiskEngine;
pub use hedging::{
    DeltaNeutralHedge, Position, ProtectivePut, delta_neutral_hedge, protective_put, put_premium,
};
pub use limits::{RiskLimits, RiskLimitsUpdate, Validation, validate};
pub use market::{ManualFeed, MarketError, MarketFeed};
pub use metrics::{
    MetricsParams, RiskMetrics, kelly_position_fraction, loan_size_risk, market_risk_factor,
    max_drawdown, raw_risk_score, risk_adjusted_return, risk_score, sharpe_ratio, value_at_risk,
};
pub use report::{Recommendation, RecommendationKind, RiskReport};
