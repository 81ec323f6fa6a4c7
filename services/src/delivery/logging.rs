use async_trait::async_trait;

use super::{AlertDelivery, DeliveryChannel, DeliveryError};

/// Writes the alert to the service log. Never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogChannel;

#[async_trait]
impl DeliveryChannel for LogChannel {
    async fn deliver(&self, alert: &AlertDelivery) -> Result<(), DeliveryError> {
        tracing::info!(
            notification_id = alert.notification_id,
            system_id = alert.system_id,
            risk_level = %alert.risk_level,
            "{}",
            alert.message
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
