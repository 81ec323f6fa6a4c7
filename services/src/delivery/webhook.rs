use std::time::Duration;

use async_trait::async_trait;

use super::{AlertDelivery, DeliveryChannel, DeliveryError};

/// POSTs the alert as JSON to a fixed URL.
pub struct WebhookChannel {
    url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, DeliveryError> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DeliveryError::ChannelUnavailable(format!(
                "webhook url must be http(s): {url}"
            )));
        }

        let mut builder = reqwest::Client::builder();
        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DeliveryError::ChannelUnavailable(e.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    fn body(alert: &AlertDelivery) -> serde_json::Value {
        serde_json::json!({
            "notification_id": alert.notification_id,
            "system_id": alert.system_id,
            "system_name": alert.system_name,
            "risk_level": alert.risk_level.to_string(),
            "probability": alert.probability,
            "message": alert.message,
            "sent_time": alert.sent_time.to_rfc3339(),
        })
    }
}

#[async_trait]
impl DeliveryChannel for WebhookChannel {
    async fn deliver(&self, alert: &AlertDelivery) -> Result<(), DeliveryError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&Self::body(alert))
            .send()
            .await
            .map_err(|e| DeliveryError::SendFailed(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::SendFailed(format!(
                "webhook responded with {status}"
            )))
        }
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::sample_alert;

    #[test]
    fn rejects_non_http_urls() {
        assert!(WebhookChannel::new("ftp://hooks.example.com", Duration::from_secs(1)).is_err());
        assert!(WebhookChannel::new("https://hooks.example.com/x", Duration::ZERO).is_ok());
    }

    #[test]
    fn body_carries_message_and_level() {
        let body = WebhookChannel::body(&sample_alert());
        assert_eq!(body["risk_level"], "High");
        assert_eq!(body["system_name"], "TestSystem");
        assert!(body["message"].as_str().unwrap().contains("(90.00%)"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_send_failure() {
        let ch =
            WebhookChannel::new("http://127.0.0.1:9/hook", Duration::from_millis(500)).unwrap();
        assert!(matches!(
            ch.deliver(&sample_alert()).await,
            Err(DeliveryError::SendFailed(_))
        ));
    }
}
