// util/src/ws/mod.rs
pub mod manager;
pub mod serve;
pub use manager::WebSocketManager;

use chrono::Utc;
use serde::Serialize;

/// Standard event envelope sent over WebSocket topics.
#[derive(Serialize)]
pub struct EventEnvelope<'a, T> {
    #[serde(rename = "type")]
    pub r#type: &'static str,
    pub event: &'a str,
    pub topic: &'a str,
    pub payload: T,
    pub ts: String,
}

/// Topic carrying notification events for one monitored system.
pub fn system_notifications_topic(system_id: i64) -> String {
    format!("systems:{system_id}:notifications")
}

/// Broadcast a JSON-serialized `EventEnvelope` on `topic`.
///
/// Returns how many live subscribers the frame was handed to.
pub async fn emit<T: Serialize>(
    ws: &WebSocketManager,
    topic: &str,
    event: &str,
    payload: &T,
) -> usize {
    let env = EventEnvelope {
        r#type: "event",
        event,
        topic,
        payload,
        ts: Utc::now().to_rfc3339(),
    };
    match serde_json::to_string(&env) {
        Ok(json) => ws.broadcast(topic, json).await,
        Err(e) => {
            tracing::warn!("Dropping '{event}' on '{topic}': {e}");
            0
        }
    }
}
