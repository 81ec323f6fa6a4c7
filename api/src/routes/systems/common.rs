use chrono::{DateTime, Utc};
use db::models::metric_snapshot::MetricReadings;
use db::models::notification;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::routes::common::format_timestamp;

#[derive(Debug, Deserialize, Validate)]
pub struct OwnerRequest {
    #[validate(range(min = 1, message = "account_id must be a positive id"))]
    pub account_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SnapshotRequest {
    #[validate(range(min = 0.0, max = 100.0, message = "cpu_usage must be between 0 and 100"))]
    pub cpu_usage: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "memory_usage must be between 0 and 100"))]
    pub memory_usage: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "disk_usage must be between 0 and 100"))]
    pub disk_usage: f64,
    #[validate(range(min = 0.0, message = "network_latency must not be negative"))]
    pub network_latency: f64,
    #[validate(range(min = 0.0, message = "error_rate must not be negative"))]
    pub error_rate: f64,
    pub captured_at: Option<DateTime<Utc>>,
}

impl SnapshotRequest {
    pub fn readings(&self) -> MetricReadings {
        MetricReadings {
            cpu_usage: self.cpu_usage,
            memory_usage: self.memory_usage,
            disk_usage: self.disk_usage,
            network_latency: self.network_latency,
            error_rate: self.error_rate,
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct SnapshotResponse {
    pub snapshot_id: i64,
    pub prediction_id: i64,
    pub probability: f64,
    pub downtime_risk: bool,
    pub estimated_time_to_downtime: Option<i32>,
}

#[derive(Debug, Default, Serialize)]
pub struct NotificationResponse {
    pub notification_id: i64,
    pub message: String,
    pub risk_level: String,
    pub status: String,
    pub sent_time: String,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            notification_id: n.id,
            message: n.message,
            risk_level: n.risk_level.to_string(),
            status: n.status.to_string(),
            sent_time: format_timestamp(&n.sent_time),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct NotificationHistory {
    pub notifications: Vec<NotificationResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}
