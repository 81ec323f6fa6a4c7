use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{AlertDelivery, DeliveryChannel, DeliveryError};

#[derive(Debug, Clone)]
pub struct EmailSettings {
    pub smtp_host: String,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Mails the alert to a fixed recipient list over SMTP (STARTTLS relay).
pub struct EmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl EmailChannel {
    pub fn new(settings: &EmailSettings) -> Result<Self, DeliveryError> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e| DeliveryError::ChannelUnavailable(format!("from address: {e}")))?;

        let to = settings
            .to
            .iter()
            .map(|addr| addr.parse::<Mailbox>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DeliveryError::ChannelUnavailable(format!("recipient: {e}")))?;
        if to.is_empty() {
            return Err(DeliveryError::ChannelUnavailable("no recipients".into()));
        }

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.smtp_host)
            .map_err(|e| DeliveryError::ChannelUnavailable(e.to_string()))?;
        if !settings.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    fn subject(alert: &AlertDelivery) -> String {
        format!(
            "[{}] Downtime risk on {}",
            alert.risk_level, alert.system_name
        )
    }

    fn body(alert: &AlertDelivery) -> String {
        format!(
            "{message}\n\nSystem: {name} (#{id})\nProbability: {prob:.2}%\nPrediction: #{prediction}\nTime: {time}",
            message = alert.message,
            name = alert.system_name,
            id = alert.system_id,
            prob = alert.probability,
            prediction = alert.prediction_id,
            time = alert.sent_time.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

#[async_trait]
impl DeliveryChannel for EmailChannel {
    async fn deliver(&self, alert: &AlertDelivery) -> Result<(), DeliveryError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(Self::subject(alert))
            .header(ContentType::TEXT_PLAIN);
        for rcpt in &self.to {
            builder = builder.to(rcpt.clone());
        }

        let email = builder
            .body(Self::body(alert))
            .map_err(|e| DeliveryError::SendFailed(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError::SendFailed(e.to_string()))
    }

    fn name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::sample_alert;

    #[test]
    fn subject_and_body_describe_the_alert() {
        let alert = sample_alert();
        assert_eq!(
            EmailChannel::subject(&alert),
            "[High] Downtime risk on TestSystem"
        );
        let body = EmailChannel::body(&alert);
        assert!(body.starts_with(&alert.message));
        assert!(body.contains("Probability: 90.00%"));
    }

    #[test]
    fn requires_at_least_one_recipient() {
        let settings = EmailSettings {
            smtp_host: "smtp.example.com".into(),
            username: String::new(),
            password: String::new(),
            from: "alerts@example.com".into(),
            to: vec![],
        };
        assert!(EmailChannel::new(&settings).is_err());
    }
}
