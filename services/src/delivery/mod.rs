//! Best-effort alert delivery.
//!
//! A [`DeliveryChannel`] pushes one freshly created notification somewhere
//! outside the database. Delivery never feeds back into the watcher: its
//! errors are logged and dropped by the caller.

mod email;
mod fanout;
mod logging;
mod webhook;
mod ws;

pub use email::{EmailChannel, EmailSettings};
pub use fanout::FanoutChannel;
pub use logging::LogChannel;
pub use webhook::WebhookChannel;
pub use ws::WebSocketChannel;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use db::models::notification::RiskLevel;
use serde::Serialize;
use thiserror::Error;
use util::ws::WebSocketManager;

/// A notification as handed to delivery channels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertDelivery {
    pub notification_id: i64,
    pub account_id: i64,
    pub system_id: i64,
    pub system_name: String,
    pub prediction_id: i64,
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub message: String,
    pub sent_time: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("failed to send notification: {0}")]
    SendFailed(String),
    #[error("notification channel unavailable: {0}")]
    ChannelUnavailable(String),
}

#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    async fn deliver(&self, alert: &AlertDelivery) -> Result<(), DeliveryError>;

    /// Short channel name used in logs (`"log"`, `"webhook"`, ...).
    fn name(&self) -> &str;
}

/// Which optional channels to enable on top of log and WebSocket push.
#[derive(Debug, Clone, Default)]
pub struct DeliverySettings {
    pub webhook_url: Option<String>,
    pub email: Option<EmailSettings>,
    pub request_timeout: Duration,
}

/// Builds the process-wide fan-out: log and WebSocket push always, webhook
/// and email when configured. A channel that fails to build is skipped.
pub fn build_channels(settings: &DeliverySettings, ws: WebSocketManager) -> FanoutChannel {
    let mut channels: Vec<Arc<dyn DeliveryChannel>> =
        vec![Arc::new(LogChannel), Arc::new(WebSocketChannel::new(ws))];

    if let Some(url) = settings.webhook_url.as_deref().filter(|u| !u.trim().is_empty()) {
        match WebhookChannel::new(url, settings.request_timeout) {
            Ok(ch) => channels.push(Arc::new(ch)),
            Err(e) => tracing::warn!("Webhook channel disabled: {e}"),
        }
    }

    if let Some(email) = &settings.email {
        match EmailChannel::new(email) {
            Ok(ch) => channels.push(Arc::new(ch)),
            Err(e) => tracing::warn!("Email channel disabled: {e}"),
        }
    }

    let fanout = FanoutChannel::new(channels);
    tracing::info!(channels = ?fanout.channel_names(), "alert delivery configured");
    fanout
}

#[cfg(test)]
pub(crate) fn sample_alert() -> AlertDelivery {
    AlertDelivery {
        notification_id: 7,
        account_id: 1,
        system_id: 3,
        system_name: "TestSystem".into(),
        prediction_id: 42,
        probability: 90.0,
        risk_level: RiskLevel::High,
        message: "⚠ High Downtime Risk Detected for TestSystem (90.00%)".into(),
        sent_time: Utc::now(),
    }
}
