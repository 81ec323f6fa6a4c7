//! Promotes high-probability predictions into notifications.
//!
//! The watcher tails the prediction log by id. For every record past its
//! cursor it resolves the system, classifies the probability, and creates at
//! most one notification per `(system_id, dedup key)`. Newly created
//! notifications are handed to a [`DeliveryChannel`]; nothing delivery does
//! can stop the loop or move the cursor.
//!
//! Records are processed strictly in id order. A store fault on one record
//! stops the batch there without advancing the cursor, so the record and
//! everything after it is retried on the next cycle.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use db::models::notification::{NewNotification, RiskLevel};
use db::models::prediction_record;
use db::store::{CursorStore, NotificationStore, TelemetryStore};
use futures::FutureExt;
use sea_orm::DbErr;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::delivery::{AlertDelivery, DeliveryChannel};

pub const DEFAULT_CURSOR_NAME: &str = "notification_watcher";

/// Set while a spawned watcher is alive in this process.
static WATCHER_RUNNING: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("a notification watcher is already running in this process")]
    AlreadyRunning,
    #[error("store error: {0}")]
    Store(#[from] DbErr),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Probabilities at or above this raise an alert.
    pub alert: f64,
    /// Alerts at or above this are `High`, otherwise `Medium`.
    pub high: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            alert: 75.0,
            high: 85.0,
        }
    }
}

/// Key under which a notification is deduplicated for one system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlertKey(String);

impl AlertKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// How alert keys are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupStrategy {
    /// The rendered message is the key. Two predictions that round to the
    /// same displayed probability produce one notification, ever.
    Message,
    /// Risk level plus the time window the prediction falls in. The same
    /// level alerts again once a new window starts.
    Condition { window: Duration },
}

impl DedupStrategy {
    /// Parses `WATCHER_DEDUP`. Anything other than `condition` means `message`.
    pub fn from_name(name: &str, window: Duration) -> Self {
        if name.trim().eq_ignore_ascii_case("condition") {
            DedupStrategy::Condition { window }
        } else {
            DedupStrategy::Message
        }
    }

    pub fn key(&self, level: RiskLevel, message: &str, at: DateTime<Utc>) -> AlertKey {
        match self {
            DedupStrategy::Message => AlertKey(message.to_string()),
            DedupStrategy::Condition { window } => {
                let secs = window.as_secs().max(1) as i64;
                let bucket = at.timestamp().div_euclid(secs);
                AlertKey(format!("{level}@{bucket}"))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    pub thresholds: Thresholds,
    pub batch_size: u64,
    pub dedup: DedupStrategy,
    pub persist_cursor: bool,
    pub cursor_name: String,
    pub delivery_timeout: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(8),
            thresholds: Thresholds::default(),
            batch_size: 500,
            dedup: DedupStrategy::Message,
            persist_cursor: true,
            cursor_name: DEFAULT_CURSOR_NAME.to_string(),
            delivery_timeout: Duration::from_secs(5),
        }
    }
}

/// Risk level for `probability`, or `None` below the alert threshold.
pub fn assess(probability: f64, thresholds: &Thresholds) -> Option<RiskLevel> {
    // NaN compares false and never alerts
    if !(probability >= thresholds.alert) {
        return None;
    }
    if probability >= thresholds.high {
        Some(RiskLevel::High)
    } else {
        Some(RiskLevel::Medium)
    }
}

pub fn render_message(level: RiskLevel, system_name: &str, probability: f64) -> String {
    format!("⚠ {level} Downtime Risk Detected for {system_name} ({probability:.2}%)")
}

/// Tally of one poll cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub scanned: usize,
    pub below_threshold: usize,
    pub alerts_created: usize,
    pub duplicates: usize,
    pub skipped_orphans: usize,
    /// Prediction id the batch stopped at after a store fault.
    pub failed_at: Option<i64>,
    /// The query returned a full batch; more records are likely waiting.
    pub batch_full: bool,
}

enum Outcome {
    Orphan,
    BelowThreshold,
    Duplicate,
    Created,
}

pub struct NotificationWatcher {
    telemetry: Arc<dyn TelemetryStore>,
    notifications: Arc<dyn NotificationStore>,
    cursors: Arc<dyn CursorStore>,
    delivery: Arc<dyn DeliveryChannel>,
    config: WatcherConfig,
    last_seen_id: i64,
}

impl NotificationWatcher {
    pub fn new(
        telemetry: Arc<dyn TelemetryStore>,
        notifications: Arc<dyn NotificationStore>,
        cursors: Arc<dyn CursorStore>,
        delivery: Arc<dyn DeliveryChannel>,
        config: WatcherConfig,
    ) -> Self {
        Self {
            telemetry,
            notifications,
            cursors,
            delivery,
            config,
            last_seen_id: 0,
        }
    }

    pub fn last_seen_id(&self) -> i64 {
        self.last_seen_id
    }

    pub fn config(&self) -> &WatcherConfig {
        &self.config
    }

    /// Loads the persisted cursor, if persistence is on. The in-memory cursor
    /// only ever moves forward.
    pub async fn resume(&mut self) -> Result<i64, WatcherError> {
        if self.config.persist_cursor {
            let stored = self.cursors.load_cursor(&self.config.cursor_name).await?;
            self.last_seen_id = self.last_seen_id.max(stored);
        }
        Ok(self.last_seen_id)
    }

    /// Runs one poll cycle.
    ///
    /// Only a failure of the batch query itself is returned as an error.
    /// Per-record faults end the batch early and show up in
    /// [`CycleReport::failed_at`].
    pub async fn poll_once(&mut self) -> Result<CycleReport, WatcherError> {
        let batch_size = self.config.batch_size.max(1);
        let batch = self
            .telemetry
            .list_predictions_since(self.last_seen_id, batch_size)
            .await?;

        let mut report = CycleReport {
            scanned: batch.len(),
            batch_full: batch.len() as u64 >= batch_size,
            ..Default::default()
        };

        for record in &batch {
            match self.process(record).await {
                Ok(outcome) => {
                    match outcome {
                        Outcome::Orphan => report.skipped_orphans += 1,
                        Outcome::BelowThreshold => report.below_threshold += 1,
                        Outcome::Duplicate => report.duplicates += 1,
                        Outcome::Created => report.alerts_created += 1,
                    }
                    self.advance(record.id).await;
                }
                Err(e) => {
                    tracing::error!(
                        prediction_id = record.id,
                        system_id = record.system_id,
                        "Watcher store fault, retrying next cycle: {e}"
                    );
                    report.failed_at = Some(record.id);
                    report.batch_full = false;
                    break;
                }
            }
        }

        let notable =
            report.alerts_created > 0 || report.skipped_orphans > 0 || report.failed_at.is_some();
        if notable {
            tracing::info!(
                scanned = report.scanned,
                created = report.alerts_created,
                duplicates = report.duplicates,
                skipped_orphans = report.skipped_orphans,
                batch_full = report.batch_full,
                cursor = self.last_seen_id,
                "watcher cycle finished"
            );
        } else {
            tracing::debug!(
                scanned = report.scanned,
                duplicates = report.duplicates,
                batch_full = report.batch_full,
                cursor = self.last_seen_id,
                "watcher cycle finished"
            );
        }

        Ok(report)
    }

    async fn process(&self, record: &prediction_record::Model) -> Result<Outcome, DbErr> {
        let Some(system) = self.telemetry.get_system(record.system_id).await? else {
            tracing::warn!(
                prediction_id = record.id,
                system_id = record.system_id,
                "Prediction references unknown system, skipping"
            );
            return Ok(Outcome::Orphan);
        };

        let probability = record.probability.unwrap_or(0.0);
        let Some(level) = assess(probability, &self.config.thresholds) else {
            return Ok(Outcome::BelowThreshold);
        };

        let message = render_message(level, &system.system_name, probability);
        let key = self.config.dedup.key(level, &message, record.created_at);

        if self
            .notifications
            .find_by_system_and_key(system.id, key.as_str())
            .await?
            .is_some()
        {
            return Ok(Outcome::Duplicate);
        }

        let new = NewNotification {
            account_id: system.account_id,
            system_id: system.id,
            message,
            dedup_key: key.as_str().to_string(),
            risk_level: level,
            sent_time: Utc::now(),
        };

        // A concurrent writer may have won since the lookup
        let Some(created) = self.notifications.insert_if_absent(&new).await? else {
            return Ok(Outcome::Duplicate);
        };

        tracing::info!(
            prediction_id = record.id,
            system_id = system.id,
            notification_id = created.id,
            risk_level = %level,
            "{}",
            created.message
        );

        self.deliver(AlertDelivery {
            notification_id: created.id,
            account_id: created.account_id,
            system_id: system.id,
            system_name: system.system_name.clone(),
            prediction_id: record.id,
            probability,
            risk_level: level,
            message: created.message,
            sent_time: created.sent_time,
        })
        .await;

        Ok(Outcome::Created)
    }

    /// Delivery errors, timeouts and panics are logged and dropped here.
    async fn deliver(&self, alert: AlertDelivery) {
        let attempt = AssertUnwindSafe(self.delivery.deliver(&alert)).catch_unwind();

        match tokio::time::timeout(self.config.delivery_timeout, attempt).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => tracing::warn!(
                notification_id = alert.notification_id,
                channel = self.delivery.name(),
                "Alert delivery failed: {e}"
            ),
            Ok(Err(_)) => tracing::error!(
                notification_id = alert.notification_id,
                channel = self.delivery.name(),
                "Alert delivery panicked"
            ),
            Err(_) => tracing::warn!(
                notification_id = alert.notification_id,
                channel = self.delivery.name(),
                "Alert delivery timed out after {:?}",
                self.config.delivery_timeout
            ),
        }
    }

    async fn advance(&mut self, id: i64) {
        if id <= self.last_seen_id {
            return;
        }
        self.last_seen_id = id;

        if self.config.persist_cursor {
            // Losing this write only means re-scanning after a restart; the
            // unique index keeps that from creating duplicates.
            if let Err(e) = self.cursors.save_cursor(&self.config.cursor_name, id).await {
                tracing::warn!(cursor = id, "Failed to persist watcher cursor: {e}");
            }
        }
    }

    /// Polls until `token` is cancelled.
    pub async fn run(mut self, token: CancellationToken) {
        match self.resume().await {
            Ok(cursor) => tracing::info!(cursor, "Watching prediction log for new entries"),
            Err(e) => tracing::error!(
                cursor = self.last_seen_id,
                "Failed to load watcher cursor, starting from memory: {e}"
            ),
        }

        loop {
            if token.is_cancelled() {
                break;
            }

            let report = match self.poll_once().await {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!("Watcher poll failed: {e}");
                    CycleReport::default()
                }
            };

            if report.batch_full {
                continue;
            }

            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }

        tracing::info!(cursor = self.last_seen_id, "Notification watcher stopped");
    }

    /// Spawns [`run`](Self::run) on the runtime. Fails if another watcher
    /// spawned in this process is still alive.
    pub fn spawn(self, token: CancellationToken) -> Result<JoinHandle<()>, WatcherError> {
        if WATCHER_RUNNING
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(WatcherError::AlreadyRunning);
        }

        // Owned by the task so an aborted, never-polled task still releases it
        let guard = RunningGuard;
        Ok(tokio::spawn(async move {
            let _guard = guard;
            self.run(token).await;
        }))
    }
}

struct RunningGuard;

impl Drop for RunningGuard {
    fn drop(&mut self) {
        WATCHER_RUNNING.store(false, Ordering::Release);
    }
}
