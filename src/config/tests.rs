//! Tests for config module.

use super::*;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

// ==================== Duration parsing tests ====================

#[test]
fn test_parse_duration_seconds() {
    assert_eq!(duration::parse_duration("10s").unwrap(), Duration::from_secs(10));
}

#[test]
fn test_parse_duration_minutes() {
    assert_eq!(duration::parse_duration("5m").unwrap(), Duration::from_secs(300));
}

#[test]
fn test_parse_duration_hours() {
    assert_eq!(duration::parse_duration("1h").unwrap(), Duration::from_secs(3600));
}

#[test]
fn test_parse_duration_days() {
    assert_eq!(duration::parse_duration("1d").unwrap(), Duration::from_secs(86_400));
}

#[test]
fn test_parse_duration_milliseconds() {
    assert_eq!(duration::parse_duration("250ms").unwrap(), Duration::from_millis(250));
}

#[test]
fn test_parse_duration_bare_number_is_seconds() {
    assert_eq!(duration::parse_duration("3").unwrap(), Duration::from_secs(3));
}

#[test]
fn test_parse_duration_empty() {
    assert_eq!(duration::parse_duration("  ").unwrap(), Duration::ZERO);
}

#[test]
fn test_parse_duration_invalid_unit() {
    let err = duration::parse_duration("10w").unwrap_err();
    assert!(err.contains("unknown duration unit"));
}

#[test]
fn test_parse_duration_invalid_number() {
    let err = duration::parse_duration("1.2.3s").unwrap_err();
    assert!(err.contains("invalid duration number"));
}

// ==================== YAML field loading tests ====================

fn from_yaml(yaml: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

const MINIMAL_YAML: &str = r#"
app:
  name: risk-engine
"#;

#[test]
fn test_minimal_config_uses_defaults() {
    let cfg = from_yaml(MINIMAL_YAML).unwrap();

    assert_eq!(cfg.app.env, "development");
    assert_eq!(cfg.portfolio.initial_equity, 10_000.0);
    assert_eq!(cfg.portfolio.max_safe_loan, 1_000_000.0);
    assert_eq!(cfg.metrics.var_confidence, 0.95);
    assert_eq!(cfg.metrics.var_horizon, 1.0);
    assert_eq!(cfg.metrics.risk_free_rate, 0.02);
    assert_eq!(cfg.market.volatility, 20.0);
    assert_eq!(cfg.monitor.refresh_interval, Duration::ZERO);
    assert_eq!(cfg.risk_limits(), RiskLimits::default());
    assert!(cfg.notification.is_none());
    assert!(cfg.storage.is_none());
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_load_app_fields() {
    let yaml = r#"
app:
  name: desk
  env: production
  log_level: debug
"#;
    let cfg = from_yaml(yaml).unwrap();

    assert_eq!(cfg.app.name, "desk");
    assert_eq!(cfg.app.env, "production");
    assert_eq!(cfg.app.log_level, Some("debug".to_string()));
}

#[test]
fn test_load_portfolio_and_metrics_fields() {
    let yaml = r#"
app:
  name: test

portfolio:
  initial_equity: 25000
  max_safe_loan: 500000

metrics:
  var_confidence: 0.99
  var_horizon: 5
  risk_free_rate: 0.01
"#;
    let cfg = from_yaml(yaml).unwrap();
    let params = cfg.metrics_params();

    assert_eq!(cfg.portfolio.initial_equity, 25_000.0);
    assert_eq!(params.var_confidence, 0.99);
    assert_eq!(params.var_horizon, 5.0);
    assert_eq!(params.risk_free_rate, 0.01);
    assert_eq!(params.max_safe_loan, 500_000.0);
}

#[test]
fn test_risk_section_overrides_only_given_fields() {
    let yaml = r#"
app:
  name: test

risk:
  min_profit: 250
  max_daily_trades: 10
  min_risk_score: 45
"#;
    let cfg = from_yaml(yaml).unwrap();
    let limits = cfg.risk_limits();

    assert_eq!(limits.min_profit, 250.0);
    assert_eq!(limits.max_daily_trades, 10);
    assert_eq!(limits.min_risk_score, 45);
    assert_eq!(limits.max_gas, 150.0);
    assert_eq!(limits.max_exposure, 1_000_000.0);
    assert_eq!(limits.stop_loss, 0.05);
}

#[test]
fn test_load_monitor_and_market_fields() {
    let yaml = r#"
app:
  name: test

monitor:
  refresh_interval: 5s
  report_interval: 30m

market:
  volatility: 42.5
"#;
    let cfg = from_yaml(yaml).unwrap();

    assert_eq!(cfg.monitor.refresh_interval, Duration::from_secs(5));
    assert_eq!(cfg.monitor.report_interval, Duration::from_secs(1800));
    assert_eq!(cfg.market.volatility, 42.5);
}

#[test]
fn test_load_notification_fields() {
    let yaml = r#"
app:
  name: test

notification:
  telegram:
    enabled: true
    notify_alerts: true
    notify_trades: false
    notify_reports: true
"#;
    let cfg = from_yaml(yaml).unwrap();

    let tg = cfg.notification.unwrap().telegram.unwrap();
    assert!(tg.enabled);
    assert!(tg.notify_alerts);
    assert!(!tg.notify_trades);
    assert!(tg.notify_reports);
    assert!(tg.bot_token.is_empty());
}

#[test]
fn test_load_storage_fields() {
    let yaml = r#"
app:
  name: test

storage:
  enabled: true
  path: "trades.db"
"#;
    let cfg = from_yaml(yaml).unwrap();

    let storage = cfg.storage.unwrap();
    assert!(storage.enabled);
    assert_eq!(storage.path, Some("trades.db".to_string()));
}

#[test]
fn test_invalid_duration_fails_parse() {
    let yaml = r#"
app:
  name: test

monitor:
  refresh_interval: 10 parsecs
"#;
    assert!(from_yaml(yaml).is_err());
}

// ==================== Validation tests ====================

#[test]
fn test_validate_empty_name() {
    let cfg = from_yaml("app:\n  name: \"\"\n").unwrap();
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("app.name is required"));
}

#[test]
fn test_validate_negative_min_profit() {
    let yaml = r#"
app:
  name: test
risk:
  min_profit: -5
"#;
    let err = from_yaml(yaml).unwrap().validate().unwrap_err();
    assert!(err.to_string().contains("risk.min_profit"));
}

#[test]
fn test_validate_slippage_range() {
    let yaml = r#"
app:
  name: test
risk:
  max_slippage: 12
"#;
    let err = from_yaml(yaml).unwrap().validate().unwrap_err();
    assert!(err.to_string().contains("between 0% and 10%"));
}

#[test]
fn test_validate_confidence_range() {
    let yaml = r#"
app:
  name: test
metrics:
  var_confidence: 1.0
"#;
    let err = from_yaml(yaml).unwrap().validate().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::OutOfRange {
            field: "metrics.var_confidence",
            ..
        }
    ));
}

#[test]
fn test_validate_initial_equity_positive() {
    let yaml = r#"
app:
  name: test
portfolio:
  initial_equity: 0
"#;
    assert!(from_yaml(yaml).unwrap().validate().is_err());
}

#[test]
fn test_validate_zero_daily_trades() {
    let yaml = r#"
app:
  name: test
risk:
  max_daily_trades: 0
"#;
    assert!(from_yaml(yaml).unwrap().validate().is_err());
}

#[test]
fn test_validate_storage_requires_path() {
    let yaml = r#"
app:
  name: test
storage:
  enabled: true
"#;
    let err = from_yaml(yaml).unwrap().validate().unwrap_err();
    assert!(err.to_string().contains("storage.path"));
}

#[test]
fn test_validate_telegram_credentials_skipped_in_development() {
    let yaml = r#"
app:
  name: test
  env: development
notification:
  telegram:
    enabled: true
"#;
    assert!(from_yaml(yaml).unwrap().validate().is_ok());
}

#[test]
fn test_validate_telegram_credentials_required_in_production() {
    let yaml = r#"
app:
  name: test
  env: production
notification:
  telegram:
    enabled: true
"#;
    let err = from_yaml(yaml).unwrap().validate().unwrap_err();
    assert!(err.to_string().contains("telegram credentials not found"));
}

// ==================== File loading tests ====================

#[test]
fn test_load_from_file() {
    let yaml = r#"
app:
  name: filebot
risk:
  max_gas: 90
"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let cfg = Config::load(file.path().to_str().unwrap()).unwrap();
    assert_eq!(cfg.app.name, "filebot");
    assert_eq!(cfg.risk_limits().max_gas, 90.0);
}

#[test]
fn test_load_file_not_found() {
    let result = Config::load("nonexistent_config.yaml");
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("failed to read config file"));
}

#[test]
fn test_load_file_validation_error() {
    let yaml = r#"
app:
  name: test
metrics:
  var_horizon: 0
"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let err = Config::load(file.path().to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("metrics.var_horizon"));
}
