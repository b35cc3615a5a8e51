//! Domain models for trades, candidates and alerts.

mod alert;
mod candidate;
mod trade;

pub use alert::{Alert, AlertKind, Severity};
pub use candidate::Candidate;
pub use trade::Trade;
