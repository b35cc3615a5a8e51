use std::env;
use std::sync::Arc;

use arbitrage_risk_engine::config::Config;
use arbitrage_risk_engine::monitor::Monitor;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_CONFIG_PATH: &str = "configs/config.yaml";
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn parse_config_path() -> String {
    for arg in env::args().skip(1) {
        if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

fn init_tracing(log_level: Option<&str>) {
    let level = match log_level {
        Some("debug") => Level::DEBUG,
        Some("info") => Level::INFO,
        Some("warn") | Some("warning") => Level::WARN,
        Some("error") => Level::ERROR,
        Some("trace") => Level::TRACE,
        _ => Level::INFO,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config_path = parse_config_path();
    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {}", e);
            return;
        }
    };

    init_tracing(config.app.log_level.as_deref());

    let monitor = match Monitor::from_config(config, VERSION).await {
        Ok(monitor) => monitor,
        Err(e) => {
            error!(error = %e, "Failed to create monitor");
            return;
        }
    };

    info!(config = %config_path, "Monitor initialized");

    // One-shot mode: refresh metrics from the restored ledger and print the report.
    if env::args().any(|arg| arg == "--report") {
        print_report(&monitor).await;
        monitor.close().await;
        return;
    }

    let monitor = Arc::new(monitor);

    let signal_monitor = Arc::clone(&monitor);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received");
            if let Err(e) = signal_monitor.stop().await {
                error!(error = %e, "Failed to stop monitor");
            }
        }
    });

    if let Err(e) = monitor.start().await {
        error!(error = %e, "Monitor error");
    }

    let _ = monitor.stop().await;
}

async fn print_report(monitor: &Monitor) {
    if let Err(e) = monitor.refresh().await {
        error!(error = %e, "Metrics refresh failed");
        return;
    }

    let report = monitor.report().await;
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => error!(error = %e, "Failed to serialize report"),
    }
}
