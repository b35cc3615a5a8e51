//! Notification events, the Notifier trait and message formatting.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::domain::{Alert, Severity};
use crate::risk::{RiskLimits, RiskReport};

/// Kind of notification event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// A risk threshold was breached.
    Alert,
    /// A trade was recorded in the ledger.
    Trade,
    /// Periodic risk report.
    Report,
    /// Monitor started.
    Startup,
    /// Monitor stopped.
    Shutdown,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Alert => write!(f, "alert"),
            EventType::Trade => write!(f, "trade"),
            EventType::Report => write!(f, "report"),
            EventType::Startup => write!(f, "startup"),
            EventType::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// A recorded trade together with the equity it produced.
#[derive(Debug, Clone)]
pub struct TradeData {
    pub seq: u64,
    pub profit: f64,
    pub equity: f64,
    pub risk_score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct StartupData {
    pub name: String,
    pub version: String,
    pub initial_equity: f64,
    /// Trades replayed from storage.
    pub restored_trades: usize,
    pub limits: RiskLimits,
}

#[derive(Debug, Clone)]
pub struct ShutdownData {
    pub reason: String,
    pub uptime: Duration,
    pub graceful: bool,
}

#[derive(Debug, Clone)]
pub enum EventData {
    Alert(Alert),
    Trade(TradeData),
    Report(Box<RiskReport>),
    Startup(StartupData),
    Shutdown(ShutdownData),
}

/// Notification event.
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    pub data: EventData,
}

impl Event {
    pub fn new(event_type: EventType, data: EventData) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            data,
        }
    }

    pub fn alert(alert: Alert) -> Self {
        Self::new(EventType::Alert, EventData::Alert(alert))
    }

    pub fn trade(data: TradeData) -> Self {
        Self::new(EventType::Trade, EventData::Trade(data))
    }

    pub fn report(report: RiskReport) -> Self {
        Self::new(EventType::Report, EventData::Report(Box::new(report)))
    }

    pub fn startup(data: StartupData) -> Self {
        Self::new(EventType::Startup, EventData::Startup(data))
    }

    pub fn shutdown(data: ShutdownData) -> Self {
        Self::new(EventType::Shutdown, EventData::Shutdown(data))
    }
}

/// Delivers notification events to an external channel.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Sends an event and waits for delivery.
    async fn send(&self, event: &Event) -> Result<(), NotificationError>;

    /// Queues an event without waiting.
    fn send_async(&self, event: Event);

    /// Whether this notifier handles the given event type.
    fn is_enabled(&self, event_type: EventType) -> bool;

    /// Flushes and releases resources.
    async fn close(&self) -> Result<(), NotificationError>;
}

/// Notification delivery error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("NotificationError: {message}")]
pub struct NotificationError {
    pub message: String,
}

impl NotificationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// MultiNotifier fans events out to several notifiers.
pub struct MultiNotifier {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl MultiNotifier {
    pub fn new(notifiers: Vec<Arc<dyn Notifier>>) -> Self {
        Self { notifiers }
    }
}

#[async_trait::async_trait]
impl Notifier for MultiNotifier {
    async fn send(&self, event: &Event) -> Result<(), NotificationError> {
        let mut errors = Vec::new();
        for notifier in &self.notifiers {
            if notifier.is_enabled(event.event_type) {
                if let Err(e) = notifier.send(event).await {
                    errors.push(e.message);
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(NotificationError::new(errors.join("; ")))
        }
    }

    fn send_async(&self, event: Event) {
        for notifier in &self.notifiers {
            if notifier.is_enabled(event.event_type) {
                notifier.send_async(event.clone());
            }
        }
    }

    fn is_enabled(&self, event_type: EventType) -> bool {
        self.notifiers.iter().any(|n| n.is_enabled(event_type))
    }

    async fn close(&self) -> Result<(), NotificationError> {
        let mut errors = Vec::new();
        for notifier in &self.notifiers {
            if let Err(e) = notifier.close().await {
                errors.push(e.message);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(NotificationError::new(errors.join("; ")))
        }
    }
}

/// LogNotifier writes every event to the tracing log.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }

    fn log(event: &Event) {
        match &event.data {
            EventData::Alert(alert) if alert.severity == Severity::High => warn!(
                id = alert.id,
                kind = %alert.kind,
                "{}",
                alert.message
            ),
            _ => info!(event_type = %event.event_type, "{}", format_event(event)),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, event: &Event) -> Result<(), NotificationError> {
        Self::log(event);
        Ok(())
    }

    fn send_async(&self, event: Event) {
        Self::log(&event);
    }

    fn is_enabled(&self, _event_type: EventType) -> bool {
        true
    }

    async fn close(&self) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// NoopNotifier drops everything; used in tests.
#[cfg(test)]
pub struct NoopNotifier;

#[cfg(test)]
#[async_trait::async_trait]
impl Notifier for NoopNotifier {
    async fn send(&self, _event: &Event) -> Result<(), NotificationError> {
        Ok(())
    }

    fn send_async(&self, _event: Event) {}

    fn is_enabled(&self, _event_type: EventType) -> bool {
        false
    }

    async fn close(&self) -> Result<(), NotificationError> {
        Ok(())
    }
}

// === Formatting ===

pub fn format_alert(alert: &Alert) -> String {
    format!(
        "{} *Risk alert* ({})\n\n\
         {}\n\n\
         Type: #{}\n\
         ⏰ {}",
        severity_icon(alert.severity),
        alert.severity,
        alert.message,
        alert.kind,
        alert.created_at.format("%H:%M:%S UTC")
    )
}

pub fn format_trade(data: &TradeData) -> String {
    let (icon, title) = if data.profit >= 0.0 {
        ("✅", "Trade recorded")
    } else {
        ("❌", "Losing trade recorded")
    };
    let score = data
        .risk_score
        .map(|s| format!("{:.0}", s))
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "{} *{}* #{}\n\n\
         Profit: *{}*\n\
         Equity: {}\n\
         Risk score: {}",
        icon,
        title,
        data.seq,
        format_money(data.profit),
        format_money(data.equity),
        score
    )
}

/// Renders a risk report as a multi-line text summary.
pub fn format_report(report: &RiskReport) -> String {
    let m = &report.metrics;
    let p = &report.portfolio;

    let mut out = format!(
        "📊 *Risk report*\n\n\
         💰 Equity: *{}* ({})\n\
         Trades: {} | Win rate: {:.1}%\n\
         Avg win: {} | Avg loss: {}\n\
         Largest win: {} | Largest loss: {}\n\
         Consecutive losses: {}\n\n\
         VaR: {:.2}% | Sharpe: {:.2}\n\
         Max drawdown: {:.2}%\n\
         Exposure: {} / {}\n\
         Avg risk score: {:.1}\n\
         Suggested position: {:.1}% of equity",
        format_money(p.current_equity),
        format_signed_money(p.total_profit),
        add_thousand_separators(p.total_trades as u64),
        p.win_rate * 100.0,
        format_money(p.avg_win),
        format_money(p.avg_loss),
        format_money(p.largest_win),
        format_money(p.largest_loss),
        p.consecutive_losses,
        m.value_at_risk * 100.0,
        m.sharpe_ratio,
        m.max_drawdown,
        format_money(m.current_exposure),
        format_money(report.limits.max_exposure),
        m.risk_score,
        report.position_fraction * 100.0,
    );

    if !report.alerts.is_empty() {
        out.push_str(&format!("\n\n⚠️ Open alerts: {}", report.alerts.len()));
        for alert in &report.alerts {
            out.push_str(&format!(
                "\n{} {}",
                severity_icon(alert.severity),
                alert.message
            ));
        }
    }

    if !report.recommendations.is_empty() {
        out.push_str("\n\n💡 Recommendations:");
        for rec in &report.recommendations {
            out.push_str(&format!("\n• [{}] {}", rec.kind, rec.message));
        }
    }

    out.push_str(&format!(
        "\n\n⏰ {}",
        report.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out
}

pub fn format_startup(data: &StartupData) -> String {
    format!(
        "🤖 *{} started*\n\n\
         Version: {}\n\
         Initial equity: {}\n\
         Restored trades: {}\n\
         Min profit: {} | Max gas: {}\n\
         Max exposure: {}\n\
         Daily trade limit: {}\n\
         Min risk score: {}",
        data.name,
        data.version,
        format_money(data.initial_equity),
        data.restored_trades,
        format_money(data.limits.min_profit),
        format_money(data.limits.max_gas),
        format_money(data.limits.max_exposure),
        data.limits.max_daily_trades,
        data.limits.min_risk_score,
    )
}

pub fn format_shutdown(data: &ShutdownData) -> String {
    let status = if data.graceful {
        "✅ Graceful"
    } else {
        "⚠️ Forced"
    };

    format!(
        "🛑 *Monitor stopped*\n\n\
         Reason: {}\n\
         Status: {}\n\
         Uptime: {}",
        data.reason,
        status,
        format_duration(data.uptime),
    )
}

pub fn format_event(event: &Event) -> String {
    match &event.data {
        EventData::Alert(alert) => format_alert(alert),
        EventData::Trade(data) => format_trade(data),
        EventData::Report(report) => format_report(report),
        EventData::Startup(data) => format_startup(data),
        EventData::Shutdown(data) => format_shutdown(data),
    }
}

// === Helpers ===

fn severity_icon(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "ℹ️",
        Severity::Medium => "⚠️",
        Severity::High => "🚨",
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// Formats an amount as `$1,234.56` (or `-$1,234.56`).
fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}${}.{:02}",
        sign,
        add_thousand_separators(cents / 100),
        cents % 100
    )
}

fn format_signed_money(amount: f64) -> String {
    if amount > 0.0 {
        format!("+{}", format_money(amount))
    } else {
        format_money(amount)
    }
}

fn add_thousand_separators(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
