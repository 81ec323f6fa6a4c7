//! A thread-safe WebSocket manager for topic-based message broadcasting.
//!
//! Uses Tokio broadcast channels per topic. Dashboards subscribe to a system's
//! notification topic; the watcher's push channel broadcasts into it.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

/// Type alias for topic name.
type Topic = String;

/// Sender for a topic's broadcast channel.
type Sender = broadcast::Sender<String>;

/// Receiver for a topic's broadcast channel.
type Receiver = broadcast::Receiver<String>;

/// Capacity of each topic channel; slow receivers lag past this many frames.
const TOPIC_CAPACITY: usize = 100;

/// Manages broadcast channels per topic to support real-time WebSocket communication.
///
/// - Lazily creates broadcast channels per topic on first subscription
/// - Removes topics when their subscriber count drops to zero after sending
#[derive(Clone, Default)]
pub struct WebSocketManager {
    /// Map of topics to broadcast senders.
    pub inner: Arc<RwLock<HashMap<Topic, Sender>>>,
}

impl WebSocketManager {
    /// Creates a new, empty `WebSocketManager`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to the given topic, creating it if necessary.
    pub async fn subscribe(&self, topic: &str) -> Receiver {
        let mut map = self.inner.write().await;
        map.entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(TOPIC_CAPACITY).0)
            .subscribe()
    }

    /// Broadcasts a message to all subscribers of `topic`.
    ///
    /// Returns the number of receivers the message reached. A topic nobody
    /// ever subscribed to is a no-op; a topic whose subscribers are all gone
    /// is dropped.
    pub async fn broadcast<T: Into<String>>(&self, topic: &str, msg: T) -> usize {
        let mut map = self.inner.write().await;
        let Some(sender) = map.get(topic) else {
            return 0;
        };
        match sender.send(msg.into()) {
            Ok(n) => n,
            Err(_) => {
                tracing::info!("Removing topic '{topic}' due to no subscribers.");
                map.remove(topic);
                0
            }
        }
    }

    /// Number of live receivers on `topic`.
    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.inner
            .read()
            .await
            .get(topic)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Duration, timeout};

    #[tokio::test]
    async fn it_broadcasts_to_all_subscribers() {
        let manager = WebSocketManager::new();
        let topic = "systems:1:notifications";

        let mut r1 = manager.subscribe(topic).await;
        let mut r2 = manager.subscribe(topic).await;

        assert_eq!(manager.broadcast(topic, "risk").await, 2);

        let msg1 = timeout(Duration::from_millis(50), r1.recv())
            .await
            .unwrap()
            .unwrap();
        let msg2 = timeout(Duration::from_millis(50), r2.recv())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(msg1, "risk");
        assert_eq!(msg2, "risk");
    }

    #[tokio::test]
    async fn broadcast_to_unknown_topic_reaches_nobody() {
        let manager = WebSocketManager::new();
        assert_eq!(manager.broadcast("no-subscribers", "silent").await, 0);
    }

    #[tokio::test]
    async fn topic_is_removed_once_subscribers_leave() {
        let manager = WebSocketManager::new();
        let topic = "ephemeral-topic";
        {
            let _rx = manager.subscribe(topic).await;
            assert_eq!(manager.subscriber_count(topic).await, 1);
        }
        assert_eq!(manager.broadcast(topic, "cleanup").await, 0);
        assert!(!manager.inner.read().await.contains_key(topic));
        assert_eq!(manager.subscriber_count(topic).await, 0);
    }
}
