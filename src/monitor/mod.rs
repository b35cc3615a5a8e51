//! Risk monitor service.
//!
//! Owns the portfolio ledger and the risk engine, validates candidates for the
//! execution collaborator, records completed trades, and periodically
//! recomputes metrics, raises alerts and publishes reports.

mod error;
mod options;
mod stats;

pub use error::MonitorError;
pub use options::MonitorOptions;
pub use stats::Stats;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::domain::{Alert, Candidate, Trade};
use crate::notification::{
    Event, LogNotifier, MultiNotifier, Notifier, ShutdownData, StartupData, TelegramConfig,
    TelegramNotifier, TradeData,
};
use crate::portfolio::{PortfolioLedger, PortfolioSummary};
use crate::risk::{
    ManualFeed, MarketFeed, RiskEngine, RiskLimitsUpdate, RiskMetrics, RiskReport, Validation,
};
use crate::storage::{SqliteStorage, SqliteStorageConfig, TradeStorage};

const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);
const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(3600);

/// Risk monitor that coordinates the ledger, engine and collaborators.
///
/// Lock order is always ledger, then engine.
pub struct Monitor {
    name: String,
    version: String,
    refresh_interval: Duration,
    report_interval: Duration,

    ledger: Mutex<PortfolioLedger>,
    engine: Mutex<RiskEngine>,

    market: Arc<dyn MarketFeed>,
    notifier: Option<Arc<dyn Notifier>>,
    storage: Option<Arc<dyn TradeStorage>>,

    // Runtime state
    started_at: Mutex<Option<Instant>>,
    running: Mutex<bool>,
    restored_trades: Mutex<usize>,
    stats: Mutex<Stats>,
}

impl Monitor {
    /// Creates a monitor without storage, using a manual market feed seeded
    /// from the config.
    pub fn new(opts: MonitorOptions) -> Result<Self, MonitorError> {
        let cfg = opts.app_config;

        let refresh_interval = non_zero_or(cfg.monitor.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        let report_interval = non_zero_or(cfg.monitor.report_interval, DEFAULT_REPORT_INTERVAL);

        let ledger = PortfolioLedger::new(cfg.portfolio.initial_equity);
        let engine = RiskEngine::new(cfg.risk_limits(), cfg.metrics_params());
        let market: Arc<dyn MarketFeed> = Arc::new(ManualFeed::new(cfg.market.volatility));

        Ok(Self {
            name: cfg.app.name.clone(),
            version: opts.version,
            refresh_interval,
            report_interval,
            ledger: Mutex::new(ledger),
            engine: Mutex::new(engine),
            market,
            notifier: build_notifier(&cfg),
            storage: None,
            started_at: Mutex::new(None),
            running: Mutex::new(false),
            restored_trades: Mutex::new(0),
            stats: Mutex::new(Stats::default()),
        })
    }

    /// Creates a monitor from config, opening storage and replaying stored
    /// trades when storage is enabled.
    pub async fn from_config(cfg: Config, version: &str) -> Result<Self, MonitorError> {
        let storage_cfg = cfg.storage.clone().filter(|s| s.enabled);

        let mut monitor = Self::new(MonitorOptions {
            app_config: cfg,
            version: version.to_string(),
        })?;

        if let Some(storage_cfg) = storage_cfg {
            let storage = SqliteStorage::new(SqliteStorageConfig {
                path: storage_cfg.path.unwrap_or_default(),
                ..SqliteStorageConfig::default()
            })
            .await?;
            monitor = monitor.with_storage(Arc::new(storage));
            monitor.restore().await?;
        }

        Ok(monitor)
    }

    /// Loads config from a YAML file and creates the monitor from it.
    pub async fn from_config_path(path: &str, version: &str) -> Result<Self, MonitorError> {
        let cfg = Config::load(path)?;
        Self::from_config(cfg, version).await
    }

    /// Replaces the market data collaborator.
    pub fn with_market_feed(mut self, market: Arc<dyn MarketFeed>) -> Self {
        self.market = market;
        self
    }

    /// Attaches a trade record store.
    pub fn with_storage(mut self, storage: Arc<dyn TradeStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Replaces the notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Replays stored trades into an empty ledger. Returns how many were loaded.
    pub async fn restore(&self) -> Result<usize, MonitorError> {
        let Some(ref storage) = self.storage else {
            return Ok(0);
        };

        let trades = storage.get_all().await?;
        let count = trades.len();

        let mut ledger = self.ledger.lock().await;
        if !ledger.trades().is_empty() {
            warn!(
                recorded = ledger.trades().len(),
                "Ledger already has trades, skipping restore"
            );
            return Ok(0);
        }
        ledger.restore(trades);
        *self.restored_trades.lock().await = count;

        info!(
            trades = count,
            equity = ledger.current_equity(),
            "Ledger restored from storage"
        );
        Ok(count)
    }

    /// Starts the monitor and runs the refresh loop until stopped.
    pub async fn start(&self) -> Result<(), MonitorError> {
        {
            let mut running = self.running.lock().await;
            if *running {
                return Err(MonitorError::AlreadyRunning);
            }
            *running = true;
        }

        {
            let mut started_at = self.started_at.lock().await;
            *started_at = Some(Instant::now());
        }

        let (initial_equity, limits) = {
            let ledger = self.ledger.lock().await;
            let engine = self.engine.lock().await;
            (ledger.initial_equity(), engine.limits().clone())
        };

        info!(
            name = %self.name,
            version = %self.version,
            initial_equity = initial_equity,
            storage = self.storage.is_some(),
            "Starting risk monitor"
        );

        self.send_notification(Event::startup(StartupData {
            name: self.name.clone(),
            version: self.version.clone(),
            initial_equity,
            restored_trades: *self.restored_trades.lock().await,
            limits,
        }))
        .await;

        self.run_main_loop().await
    }

    /// Gracefully stops the monitor.
    pub async fn stop(&self) -> Result<(), MonitorError> {
        {
            let mut running = self.running.lock().await;
            if !*running {
                return Ok(());
            }
            *running = false;
        }

        info!("Stopping monitor...");

        let uptime = self.uptime().await;

        self.send_notification(Event::shutdown(ShutdownData {
            reason: "graceful shutdown".to_string(),
            uptime,
            graceful: true,
        }))
        .await;

        self.close().await;

        info!(uptime = ?uptime, "Monitor stopped");

        Ok(())
    }

    /// Flushes the notifier and closes storage without touching run state.
    pub async fn close(&self) {
        if let Some(ref notifier) = self.notifier {
            let _ = notifier.close().await;
        }

        if let Some(ref storage) = self.storage {
            if let Err(e) = storage.close().await {
                warn!(error = %e, "Failed to close storage");
            }
        }
    }

    /// Validates a candidate against current limits and ledger state.
    pub async fn evaluate(&self, candidate: &Candidate) -> Result<Validation, MonitorError> {
        let volatility = self.market.volatility().await?;

        let validation = {
            let ledger = self.ledger.lock().await;
            let engine = self.engine.lock().await;
            engine.validate(candidate, &ledger, volatility)
        };

        self.count_validation(&validation).await;
        Ok(validation)
    }

    /// Validates a candidate and, if accepted, reserves its loan amount as
    /// exposure in the same critical section.
    ///
    /// The caller must follow up with [`Monitor::complete_execution`] or
    /// [`Monitor::abort_execution`].
    pub async fn begin_execution(&self, candidate: &Candidate) -> Result<Validation, MonitorError> {
        let volatility = self.market.volatility().await?;

        let validation = {
            let mut ledger = self.ledger.lock().await;
            let engine = self.engine.lock().await;
            let validation = engine.validate(candidate, &ledger, volatility);
            if validation.accepted {
                ledger.reserve_exposure(candidate.loan_amount);
            }
            validation
        };

        if validation.accepted {
            debug!(
                loan_amount = candidate.loan_amount,
                risk_score = validation.risk_score,
                "Execution started"
            );
        }

        self.count_validation(&validation).await;
        Ok(validation)
    }

    /// Releases the loan exposure of a finished execution and records the
    /// realized trade.
    pub async fn complete_execution(
        &self,
        loan_amount: f64,
        realized_profit: f64,
        risk_score: Option<f64>,
    ) -> Trade {
        self.record(Some(loan_amount), realized_profit, risk_score)
            .await
    }

    /// Releases the loan exposure of an execution that did not complete.
    pub async fn abort_execution(&self, loan_amount: f64) {
        self.ledger.lock().await.release_exposure(loan_amount);
        debug!(loan_amount = loan_amount, "Execution aborted");
    }

    /// Records a completed trade that held no reserved exposure.
    pub async fn record_trade(&self, realized_profit: f64, risk_score: Option<f64>) -> Trade {
        self.record(None, realized_profit, risk_score).await
    }

    async fn record(
        &self,
        release: Option<f64>,
        profit: f64,
        risk_score: Option<f64>,
    ) -> Trade {
        let (trade, equity) = {
            let mut ledger = self.ledger.lock().await;
            if let Some(amount) = release {
                ledger.release_exposure(amount);
            }
            let trade = ledger
                .record_trade_at(profit, risk_score, chrono::Utc::now())
                .clone();
            (trade, ledger.current_equity())
        };

        self.stats.lock().await.on_trade(profit);

        info!(
            seq = trade.seq,
            profit = profit,
            equity = equity,
            "Trade recorded"
        );

        if let Some(ref storage) = self.storage {
            match storage.save(&trade).await {
                Ok(true) => {}
                Ok(false) => {
                    error!(seq = trade.seq, "Trade seq already stored, trade not persisted");
                }
                Err(e) => {
                    error!(seq = trade.seq, error = %e, "Failed to persist trade");
                }
            }
        }

        if let Some(ref notifier) = self.notifier {
            notifier.send_async(Event::trade(TradeData {
                seq: trade.seq,
                profit,
                equity,
                risk_score,
            }));
        }

        trade
    }

    /// Recomputes metrics and scans for alerts.
    pub async fn refresh(&self) -> Result<(RiskMetrics, Vec<Alert>), MonitorError> {
        let volatility = self.market.volatility().await?;

        let (metrics, raised) = {
            let ledger = self.ledger.lock().await;
            let mut engine = self.engine.lock().await;
            engine.update_metrics(&ledger, volatility)
        };

        {
            let mut stats = self.stats.lock().await;
            stats.refresh_cycles += 1;
            stats.alerts_raised += raised.len() as u64;
        }

        debug!(
            var = metrics.value_at_risk,
            sharpe = metrics.sharpe_ratio,
            max_drawdown = metrics.max_drawdown,
            exposure = metrics.current_exposure,
            alerts = raised.len(),
            "Metrics refreshed"
        );

        if let Some(ref notifier) = self.notifier {
            for alert in &raised {
                notifier.send_async(Event::alert(alert.clone()));
            }
        }

        Ok((metrics, raised))
    }

    /// Builds a report from the latest metrics.
    pub async fn report(&self) -> RiskReport {
        let ledger = self.ledger.lock().await;
        let engine = self.engine.lock().await;
        engine.report(&ledger)
    }

    pub async fn summary(&self) -> PortfolioSummary {
        self.ledger.lock().await.summary()
    }

    /// Merges new limit values; unspecified fields keep their value.
    pub async fn update_limits(&self, update: &RiskLimitsUpdate) {
        self.engine.lock().await.update_limits(update);
    }

    pub async fn acknowledge_alert(&self, id: u64) -> bool {
        self.engine.lock().await.acknowledge_alert(id)
    }

    pub async fn clear_alerts(&self) {
        self.engine.lock().await.clear_alerts();
    }

    /// Returns a copy of the current statistics.
    pub async fn stats(&self) -> Stats {
        self.stats.lock().await.clone()
    }

    /// Returns true if the monitor loop is running.
    pub async fn is_running(&self) -> bool {
        *self.running.lock().await
    }

    /// Returns how long the monitor has been running.
    pub async fn uptime(&self) -> Duration {
        self.started_at
            .lock()
            .await
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO)
    }

    async fn count_validation(&self, validation: &Validation) {
        let mut stats = self.stats.lock().await;
        stats.candidates_evaluated += 1;
        if validation.accepted {
            stats.candidates_accepted += 1;
        } else {
            stats.candidates_rejected += 1;
        }
    }

    async fn run_main_loop(&self) -> Result<(), MonitorError> {
        let mut refresh_timer = tokio::time::interval(self.refresh_interval);
        let mut report_timer = tokio::time::interval(self.report_interval);
        // The first tick completes immediately.
        report_timer.tick().await;

        info!(
            refresh_interval = ?self.refresh_interval,
            report_interval = ?self.report_interval,
            "Starting monitoring loop"
        );

        loop {
            tokio::select! {
                _ = refresh_timer.tick() => {
                    if !self.is_running().await {
                        break;
                    }
                    if let Err(e) = self.refresh().await {
                        warn!(error = %e, "Metrics refresh failed");
                    }
                }
                _ = report_timer.tick() => {
                    if !self.is_running().await {
                        break;
                    }
                    self.publish_report().await;
                }
            }
        }

        Ok(())
    }

    /// Sends the current report to the notifier.
    pub async fn publish_report(&self) {
        let report = self.report().await;
        self.stats.lock().await.reports_published += 1;
        self.send_notification(Event::report(report)).await;
    }

    async fn send_notification(&self, event: Event) {
        if let Some(ref notifier) = self.notifier {
            if let Err(e) = notifier.send(&event).await {
                debug!(
                    event_type = %event.event_type,
                    error = %e,
                    "Failed to send notification"
                );
            }
        }
    }
}

fn non_zero_or(value: Duration, default: Duration) -> Duration {
    if value.is_zero() { default } else { value }
}

/// Log notifications are always on; Telegram is added when configured with
/// credentials.
fn build_notifier(cfg: &Config) -> Option<Arc<dyn Notifier>> {
    let mut notifiers: Vec<Arc<dyn Notifier>> = vec![Arc::new(LogNotifier::new())];

    if let Some(telegram) = cfg
        .notification
        .as_ref()
        .and_then(|n| n.telegram.as_ref())
    {
        if telegram.enabled && !telegram.bot_token.is_empty() && !telegram.chat_id.is_empty() {
            match TelegramNotifier::new(TelegramConfig::from(telegram)) {
                Ok(notifier) => {
                    notifiers.push(Arc::new(notifier));
                    info!("Telegram notifier created");
                }
                Err(e) => {
                    warn!(error = %e, "Failed to create Telegram notifier");
                }
            }
        }
    }

    Some(Arc::new(MultiNotifier::new(notifiers)))
}
