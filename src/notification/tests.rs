//! Tests for notification formatting and fan-out.

use super::*;
use crate::domain::AlertKind;
use crate::portfolio::PortfolioLedger;
use crate::risk::{MetricsParams, RiskEngine};
use std::sync::atomic::{AtomicUsize, Ordering};

// ==================== Helper function tests ====================

#[test]
fn test_format_money_positive() {
    assert_eq!(format_money(1234.5), "$1,234.50");
}

#[test]
fn test_format_money_negative() {
    assert_eq!(format_money(-150.0), "-$150.00");
}

#[test]
fn test_format_money_rounds_tiny_negative_to_zero() {
    assert_eq!(format_money(-0.001), "$0.00");
}

#[test]
fn test_format_signed_money() {
    assert_eq!(format_signed_money(100.0), "+$100.00");
    assert_eq!(format_signed_money(-5.0), "-$5.00");
    assert_eq!(format_signed_money(0.0), "$0.00");
}

#[test]
fn test_format_duration_units() {
    assert_eq!(format_duration(Duration::from_secs(45)), "45s");
    assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    assert_eq!(format_duration(Duration::from_secs(3725)), "1h 2m");
    assert_eq!(format_duration(Duration::from_secs(90000)), "1d 1h");
}

#[test]
fn test_add_thousand_separators() {
    assert_eq!(add_thousand_separators(0), "0");
    assert_eq!(add_thousand_separators(999), "999");
    assert_eq!(add_thousand_separators(1234567), "1,234,567");
}

// ==================== Event formatting tests ====================

fn sample_alert() -> Alert {
    Alert {
        id: 7,
        kind: AlertKind::Drawdown,
        message: "Maximum drawdown exceeded 20%: 31.00%".to_string(),
        severity: Severity::High,
        created_at: Utc::now(),
        acknowledged: false,
    }
}

#[test]
fn test_format_alert() {
    let msg = format_alert(&sample_alert());
    assert!(msg.contains("🚨"));
    assert!(msg.contains("(high)"));
    assert!(msg.contains("#drawdown"));
    assert!(msg.contains("31.00%"));
}

#[test]
fn test_format_trade_win_and_loss() {
    let win = format_trade(&TradeData {
        seq: 3,
        profit: 200.0,
        equity: 10_200.0,
        risk_score: Some(81.0),
    });
    assert!(win.contains("✅"));
    assert!(win.contains("$200.00"));
    assert!(win.contains("$10,200.00"));
    assert!(win.contains("Risk score: 81"));

    let loss = format_trade(&TradeData {
        seq: 4,
        profit: -150.0,
        equity: 10_050.0,
        risk_score: None,
    });
    assert!(loss.contains("❌"));
    assert!(loss.contains("-$150.00"));
    assert!(loss.contains("n/a"));
}

#[test]
fn test_format_report_contains_sections() {
    let mut ledger = PortfolioLedger::new(10_000.0);
    for p in [200.0, -150.0, 50.0, -3_000.0] {
        ledger.record_trade(p);
    }
    let mut engine = RiskEngine::new(RiskLimits::default(), MetricsParams::default());
    engine.update_metrics(&ledger, 60.0);

    let text = format_report(&engine.report(&ledger));

    assert!(text.contains("Risk report"));
    assert!(text.contains("Equity: *$7,100.00* (-$2,900.00)"));
    assert!(text.contains("Trades: 4 | Win rate: 50.0%"));
    assert!(text.contains("Open alerts: 2"));
    assert!(text.contains("High market volatility detected: 60.0"));
    assert!(text.contains("Recommendations:"));
    assert!(text.contains("[risk]"));
}

#[test]
fn test_format_report_without_alerts() {
    let ledger = PortfolioLedger::default();
    let engine = RiskEngine::new(RiskLimits::default(), MetricsParams::default());
    let text = format_report(&engine.report(&ledger));

    assert!(!text.contains("Open alerts"));
    assert!(text.contains("Exposure: $0.00 / $1,000,000.00"));
}

#[test]
fn test_format_startup() {
    let msg = format_startup(&StartupData {
        name: "risk-desk".to_string(),
        version: "0.1.0".to_string(),
        initial_equity: 10_000.0,
        restored_trades: 12,
        limits: RiskLimits::default(),
    });

    assert!(msg.contains("risk-desk started"));
    assert!(msg.contains("Restored trades: 12"));
    assert!(msg.contains("Daily trade limit: 50"));
}

#[test]
fn test_format_shutdown() {
    let msg = format_shutdown(&ShutdownData {
        reason: "ctrl-c".to_string(),
        uptime: Duration::from_secs(125),
        graceful: true,
    });
    assert!(msg.contains("ctrl-c"));
    assert!(msg.contains("Graceful"));
    assert!(msg.contains("2m 5s"));
}

#[test]
fn test_format_event_dispatch() {
    let event = Event::alert(sample_alert());
    assert_eq!(event.event_type, EventType::Alert);
    assert_eq!(format_event(&event), format_alert(&sample_alert()));
}

// ==================== MultiNotifier tests ====================

struct CountingNotifier {
    sent: AtomicUsize,
    fail: bool,
}

#[async_trait::async_trait]
impl Notifier for CountingNotifier {
    async fn send(&self, _event: &Event) -> Result<(), NotificationError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(NotificationError::new("boom"))
        } else {
            Ok(())
        }
    }

    fn send_async(&self, _event: Event) {
        self.sent.fetch_add(1, Ordering::SeqCst);
    }

    fn is_enabled(&self, event_type: EventType) -> bool {
        event_type != EventType::Trade
    }

    async fn close(&self) -> Result<(), NotificationError> {
        Ok(())
    }
}

fn counting(fail: bool) -> Arc<CountingNotifier> {
    Arc::new(CountingNotifier {
        sent: AtomicUsize::new(0),
        fail,
    })
}

#[tokio::test]
async fn test_multi_notifier_fans_out_and_collects_errors() {
    let ok = counting(false);
    let failing = counting(true);
    let multi = MultiNotifier::new(vec![
        ok.clone(),
        failing.clone(),
        Arc::new(NoopNotifier),
    ]);

    let err = multi.send(&Event::alert(sample_alert())).await.unwrap_err();
    assert_eq!(err.message, "boom");
    assert_eq!(ok.sent.load(Ordering::SeqCst), 1);
    assert_eq!(failing.sent.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_multi_notifier_respects_filters() {
    let ok = counting(false);
    let multi = MultiNotifier::new(vec![ok.clone()]);

    let trade = Event::trade(TradeData {
        seq: 1,
        profit: 1.0,
        equity: 1.0,
        risk_score: None,
    });
    multi.send_async(trade);

    assert_eq!(ok.sent.load(Ordering::SeqCst), 0);
    assert!(!multi.is_enabled(EventType::Trade));
    assert!(multi.is_enabled(EventType::Report));
}

#[tokio::test]
async fn test_log_notifier_accepts_everything() {
    let notifier = LogNotifier::new();
    assert!(notifier.is_enabled(EventType::Trade));
    assert!(notifier.send(&Event::alert(sample_alert())).await.is_ok());
    assert!(notifier.close().await.is_ok());
}
