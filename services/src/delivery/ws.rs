use async_trait::async_trait;
use util::ws::{WebSocketManager, emit, system_notifications_topic};

use super::{AlertDelivery, DeliveryChannel, DeliveryError};

pub const NOTIFICATION_CREATED: &str = "notification.created";

/// Pushes `notification.created` onto the system's topic.
///
/// Nobody listening is not an error.
#[derive(Clone)]
pub struct WebSocketChannel {
    ws: WebSocketManager,
}

impl WebSocketChannel {
    pub fn new(ws: WebSocketManager) -> Self {
        Self { ws }
    }
}

#[async_trait]
impl DeliveryChannel for WebSocketChannel {
    async fn deliver(&self, alert: &AlertDelivery) -> Result<(), DeliveryError> {
        let topic = system_notifications_topic(alert.system_id);
        let reached = emit(&self.ws, &topic, NOTIFICATION_CREATED, alert).await;
        tracing::debug!(topic = %topic, reached, "pushed notification");
        Ok(())
    }

    fn name(&self) -> &str {
        "websocket"
    }
}
