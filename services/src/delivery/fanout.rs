use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::join_all;

use super::{AlertDelivery, DeliveryChannel, DeliveryError};

/// Forwards each alert to every inner channel.
///
/// Channels run concurrently, so a stalled or panicking channel never holds
/// back the others. Failures are logged per channel and the first one, in
/// channel order, is returned.
#[derive(Clone, Default)]
pub struct FanoutChannel {
    channels: Vec<Arc<dyn DeliveryChannel>>,
}

impl FanoutChannel {
    pub fn new(channels: Vec<Arc<dyn DeliveryChannel>>) -> Self {
        Self { channels }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }
}

#[async_trait]
impl DeliveryChannel for FanoutChannel {
    async fn deliver(&self, alert: &AlertDelivery) -> Result<(), DeliveryError> {
        let attempts = self.channels.iter().map(|channel| async move {
            let outcome = AssertUnwindSafe(channel.deliver(alert))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(DeliveryError::SendFailed(format!(
                        "channel '{}' panicked",
                        channel.name()
                    )))
                });
            (channel, outcome)
        });

        let mut first_error = None;
        for (channel, outcome) in join_all(attempts).await {
            if let Err(e) = outcome {
                tracing::warn!(
                    channel = channel.name(),
                    notification_id = alert.notification_id,
                    "Notification delivery failed: {e}"
                );
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn name(&self) -> &str {
        "fanout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::sample_alert;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl DeliveryChannel for Counting {
        async fn deliver(&self, _alert: &AlertDelivery) -> Result<(), DeliveryError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct Failing(&'static str);

    #[async_trait]
    impl DeliveryChannel for Failing {
        async fn deliver(&self, _alert: &AlertDelivery) -> Result<(), DeliveryError> {
            Err(DeliveryError::SendFailed(self.0.to_string()))
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    #[tokio::test]
    async fn calls_every_channel_and_returns_first_error() {
        let count = Arc::new(AtomicUsize::new(0));
        let fanout = FanoutChannel::new(vec![
            Arc::new(Counting(count.clone())),
            Arc::new(Failing("first")),
            Arc::new(Failing("second")),
            Arc::new(Counting(count.clone())),
        ]);

        let err = fanout.deliver(&sample_alert()).await.unwrap_err();
        assert_eq!(err.to_string(), "failed to send notification: first");
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    struct Stalling;

    #[async_trait]
    impl DeliveryChannel for Stalling {
        async fn deliver(&self, _alert: &AlertDelivery) -> Result<(), DeliveryError> {
            futures::future::pending::<()>().await;
            Ok(())
        }

        fn name(&self) -> &str {
            "stalling"
        }
    }

    struct Panicking;

    #[async_trait]
    impl DeliveryChannel for Panicking {
        async fn deliver(&self, _alert: &AlertDelivery) -> Result<(), DeliveryError> {
            panic!("channel blew up");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn stalled_channel_does_not_hold_back_later_channels() {
        let count = Arc::new(AtomicUsize::new(0));
        let fanout = FanoutChannel::new(vec![
            Arc::new(Stalling),
            Arc::new(Counting(count.clone())),
        ]);

        let alert = sample_alert();
        let outcome = tokio::time::timeout(
            std::time::Duration::from_millis(100),
            fanout.deliver(&alert),
        )
        .await;

        assert!(outcome.is_err(), "stalled channel should hit the timeout");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_channel_is_reported_and_others_still_run() {
        let count = Arc::new(AtomicUsize::new(0));
        let fanout = FanoutChannel::new(vec![
            Arc::new(Panicking),
            Arc::new(Counting(count.clone())),
        ]);

        let err = fanout.deliver(&sample_alert()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to send notification: channel 'panicking' panicked"
        );
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_fanout_succeeds() {
        assert!(FanoutChannel::default().deliver(&sample_alert()).await.is_ok());
    }
}
