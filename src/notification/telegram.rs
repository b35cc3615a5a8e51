//! Telegram Bot API notifier.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::error;

use crate::notification::{Event, EventType, NotificationError, Notifier, format_event};

const TELEGRAM_API_URL: &str = "https://api.telegram.org/bot";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_MESSAGE_LENGTH: usize = 4096;
const ASYNC_QUEUE_SIZE: usize = 100;

/// Telegram notifier settings.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token from BotFather.
    pub bot_token: String,
    /// Chat that receives messages.
    pub chat_id: String,
    pub notify_alerts: bool,
    pub notify_trades: bool,
    pub notify_reports: bool,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            notify_alerts: true,
            notify_trades: false,
            notify_reports: true,
        }
    }
}

impl From<&crate::config::TelegramConfig> for TelegramConfig {
    fn from(cfg: &crate::config::TelegramConfig) -> Self {
        Self {
            bot_token: cfg.bot_token.clone(),
            chat_id: cfg.chat_id.clone(),
            notify_alerts: cfg.notify_alerts,
            notify_trades: cfg.notify_trades,
            notify_reports: cfg.notify_reports,
        }
    }
}

/// TelegramNotifier posts formatted events to a Telegram chat.
///
/// `send_async` hands events to a background worker through a bounded queue;
/// events are dropped (and logged) when the queue is full.
pub struct TelegramNotifier {
    config: TelegramConfig,
    http_client: reqwest::Client,
    api_url: String,
    sender: mpsc::Sender<Event>,
}

impl TelegramNotifier {
    /// Creates the notifier and spawns its delivery worker.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(config: TelegramConfig) -> Result<Self, NotificationError> {
        if config.bot_token.is_empty() {
            return Err(NotificationError::new("bot_token is required"));
        }
        if config.chat_id.is_empty() {
            return Err(NotificationError::new("chat_id is required"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| NotificationError::new(format!("Failed to create HTTP client: {}", e)))?;

        let api_url = format!("{}{}", TELEGRAM_API_URL, config.bot_token);
        let (sender, receiver) = mpsc::channel(ASYNC_QUEUE_SIZE);

        Self::spawn_worker(
            receiver,
            http_client.clone(),
            api_url.clone(),
            config.chat_id.clone(),
        );

        Ok(Self {
            config,
            http_client,
            api_url,
            sender,
        })
    }

    fn spawn_worker(
        mut receiver: mpsc::Receiver<Event>,
        http_client: reqwest::Client,
        api_url: String,
        chat_id: String,
    ) {
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                let text = format_event(&event);
                if let Err(e) = post_message(&http_client, &api_url, &chat_id, &text).await {
                    error!(error = %e, event_type = %event.event_type, "Failed to send Telegram message");
                }
            }
        });
    }
}

/// Cuts a message to Telegram's limit without splitting a UTF-8 character.
fn truncate_message(text: &str) -> &str {
    if text.len() <= MAX_MESSAGE_LENGTH {
        return text;
    }
    let mut end = MAX_MESSAGE_LENGTH;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

async fn post_message(
    http_client: &reqwest::Client,
    api_url: &str,
    chat_id: &str,
    text: &str,
) -> Result<(), NotificationError> {
    let payload = serde_json::json!({
        "chat_id": chat_id,
        "text": truncate_message(text),
        "parse_mode": "Markdown"
    });

    let response = http_client
        .post(format!("{}/sendMessage", api_url))
        .json(&payload)
        .send()
        .await
        .map_err(|e| NotificationError::new(format!("HTTP request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(NotificationError::new(format!(
            "Telegram API error: {} - {}",
            status, body
        )));
    }

    Ok(())
}

#[async_trait::async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, event: &Event) -> Result<(), NotificationError> {
        if !self.is_enabled(event.event_type) {
            return Ok(());
        }

        let text = format_event(event);
        post_message(&self.http_client, &self.api_url, &self.config.chat_id, &text).await
    }

    fn send_async(&self, event: Event) {
        if !self.is_enabled(event.event_type) {
            return;
        }

        if let Err(e) = self.sender.try_send(event) {
            error!(error = %e, "Failed to queue Telegram message");
        }
    }

    fn is_enabled(&self, event_type: EventType) -> bool {
        match event_type {
            EventType::Startup | EventType::Shutdown => true,
            EventType::Alert => self.config.notify_alerts,
            EventType::Trade => self.config.notify_trades,
            EventType::Report => self.config.notify_reports,
        }
    }

    async fn close(&self) -> Result<(), NotificationError> {
        // Give the worker a moment to drain queued messages.
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(())
    }
}
