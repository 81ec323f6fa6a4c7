//! Thin HTTP client for the monitoring API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::source::Reading;

/// Envelope used by every `/api` route except the notification poll.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    data: Value,
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotAck {
    pub snapshot_id: i64,
    pub prediction_id: i64,
    pub probability: f64,
    pub downtime_risk: bool,
    pub estimated_time_to_downtime: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Alert {
    pub notification_id: i64,
    pub message: String,
    pub risk_level: String,
    pub sent_time: String,
}

#[derive(Debug, Deserialize)]
struct AlertBatch {
    notifications: Vec<Alert>,
}

#[derive(Debug, Deserialize)]
struct Registered {
    system_id: i64,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("monitor-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Registers this host under `account_id` and returns the new system id.
    pub async fn register_system(
        &self,
        account_id: i64,
        system_name: &str,
        location: Option<&str>,
    ) -> Result<i64> {
        let url = format!("{}/api/accounts/{account_id}/systems", self.base_url);
        let body = json!({ "system_name": system_name, "location": location });
        let res = self.http.post(&url).json(&body).send().await?;
        let registered: Registered = unwrap_envelope(res).await?;
        Ok(registered.system_id)
    }

    pub async fn post_snapshot(&self, system_id: i64, reading: &Reading) -> Result<SnapshotAck> {
        let url = format!("{}/api/systems/{system_id}/snapshots", self.base_url);
        let res = self.http.post(&url).json(reading).send().await?;
        unwrap_envelope(res).await
    }

    /// Fetches unread alerts. The server marks them read, so each alert is
    /// returned by exactly one poll.
    pub async fn poll_notifications(&self, system_id: i64) -> Result<Vec<Alert>> {
        let url = format!("{}/api/notifications/{system_id}", self.base_url);
        let res = self.http.get(&url).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body: Value = res.json().await.unwrap_or(Value::Null);
            let reason = body["error"].as_str().unwrap_or("unknown error").to_string();
            return Err(anyhow!("notification poll failed ({status}): {reason}"));
        }
        let batch: AlertBatch = res.json().await.context("malformed notification batch")?;
        Ok(batch.notifications)
    }
}

async fn unwrap_envelope<T: for<'de> Deserialize<'de>>(
    res: reqwest::Response,
) -> Result<T> {
    let status = res.status();
    let env: Envelope = res
        .json()
        .await
        .with_context(|| format!("unexpected response body ({status})"))?;
    if !status.is_success() || !env.success {
        return Err(anyhow!("{} ({status})", env.message));
    }
    serde_json::from_value(env.data).context("unexpected response payload")
}
