use std::{sync::Arc, time::Duration};

use db::store::DbStore;
use services::delivery::{DeliverySettings, EmailSettings, build_channels};
use services::watcher::{DedupStrategy, NotificationWatcher, Thresholds, WatcherConfig};
use util::{config, state::AppState};

/// Outbound channel settings from config. Email is only configured when an
/// SMTP host is set, and a blank webhook URL disables the webhook.
pub fn delivery_settings() -> DeliverySettings {
    let smtp_host = config::smtp_host();
    let email = (!smtp_host.trim().is_empty()).then(|| EmailSettings {
        smtp_host,
        username: config::smtp_username(),
        password: config::smtp_password(),
        from: config::alert_email_from(),
        to: config::alert_email_to(),
    });

    DeliverySettings {
        webhook_url: Some(config::alert_webhook_url()).filter(|url| !url.trim().is_empty()),
        email,
        request_timeout: Duration::from_secs(config::delivery_timeout_seconds()),
    }
}

pub fn watcher_config() -> WatcherConfig {
    WatcherConfig {
        poll_interval: Duration::from_secs(config::watcher_poll_seconds().max(1)),
        thresholds: Thresholds {
            alert: config::alert_threshold(),
            high: config::high_risk_threshold(),
        },
        batch_size: config::watcher_batch_size().max(1),
        dedup: DedupStrategy::from_name(
            &config::watcher_dedup(),
            Duration::from_secs(config::watcher_realert_seconds()),
        ),
        persist_cursor: config::watcher_persist_cursor(),
        delivery_timeout: Duration::from_secs(config::delivery_timeout_seconds()),
        ..WatcherConfig::default()
    }
}

/// The background watcher over the app's database, delivering through every
/// configured channel plus the WebSocket push.
pub fn build_watcher(app_state: &AppState) -> NotificationWatcher {
    let delivery = Arc::new(build_channels(&delivery_settings(), app_state.ws_clone()));

    let store = Arc::new(DbStore::new(app_state.db_clone()));
    NotificationWatcher::new(
        store.clone(),
        store.clone(),
        store,
        delivery,
        watcher_config(),
    )
}
