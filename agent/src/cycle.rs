use tracing::{info, warn};

use crate::client::{Alert, ApiClient, SnapshotAck};
use crate::source::MetricSource;

/// What one agent cycle achieved. Either half can fail independently.
#[derive(Debug, Default)]
pub struct CycleOutcome {
    pub ack: Option<SnapshotAck>,
    pub alerts: Vec<Alert>,
}

/// Samples, posts the snapshot, then drains pending alerts.
///
/// Failures are logged and never abort the agent; the next cycle simply
/// tries again.
pub async fn run_cycle(
    source: &dyn MetricSource,
    client: &ApiClient,
    system_id: i64,
) -> CycleOutcome {
    let mut outcome = CycleOutcome::default();

    match source.sample().await {
        Ok(reading) => match client.post_snapshot(system_id, &reading).await {
            Ok(ack) => {
                info!(
                    system_id,
                    cpu = reading.cpu_usage,
                    mem = reading.memory_usage,
                    risk = %format!("{:.2}%", ack.probability),
                    "Snapshot recorded"
                );
                outcome.ack = Some(ack);
            }
            Err(e) => warn!(system_id, "Snapshot upload failed: {e:#}"),
        },
        Err(e) => warn!(system_id, "Sampling failed: {e:#}"),
    }

    match client.poll_notifications(system_id).await {
        Ok(alerts) => {
            for alert in &alerts {
                warn!(
                    system_id,
                    notification_id = alert.notification_id,
                    risk_level = %alert.risk_level,
                    sent_time = %alert.sent_time,
                    "{} Risk Alert: {}",
                    alert.risk_level,
                    alert.message
                );
            }
            outcome.alerts = alerts;
        }
        Err(e) => warn!(system_id, "Notification fetch failed: {e:#}"),
    }

    outcome
}
