//! Portfolio risk engine for flash-loan arbitrage.
//!
//! The execution collaborator calls into [`monitor::Monitor`] to validate
//! candidates, reserve and release loan exposure, and record realized trades.
//! The monitor keeps the [`portfolio::PortfolioLedger`] and the
//! [`risk::RiskEngine`] consistent and runs the periodic refresh loop.

pub mod config;
pub mod domain;
pub mod monitor;
pub mod notification;
pub mod portfolio;
pub mod risk;
pub mod storage;
