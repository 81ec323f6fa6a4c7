use std::time::Duration;

use api::startup::{build_watcher, delivery_settings, watcher_config};
use serial_test::serial;
use services::watcher::{DedupStrategy, Thresholds};
use util::config::AppConfig;

use crate::helpers::make_test_app;

#[test]
#[serial]
fn watcher_config_follows_app_config() {
    AppConfig::set_alert_threshold(60.0);
    AppConfig::set_high_risk_threshold(90.0);
    AppConfig::set_watcher_dedup("condition");
    AppConfig::set_watcher_poll_seconds(0);
    AppConfig::set_watcher_persist_cursor(false);

    let cfg = watcher_config();
    AppConfig::reset();

    assert_eq!(
        cfg.thresholds,
        Thresholds {
            alert: 60.0,
            high: 90.0
        }
    );
    assert!(matches!(cfg.dedup, DedupStrategy::Condition { .. }));
    assert_eq!(cfg.poll_interval, Duration::from_secs(1));
    assert!(!cfg.persist_cursor);
}

#[test]
#[serial]
fn blank_webhook_url_disables_the_webhook() {
    AppConfig::set_alert_webhook_url("   ");
    let blank = delivery_settings();
    AppConfig::set_alert_webhook_url("http://hooks.example.com/alerts");
    let set = delivery_settings();
    AppConfig::reset();

    assert_eq!(blank.webhook_url, None);
    assert_eq!(
        set.webhook_url.as_deref(),
        Some("http://hooks.example.com/alerts")
    );
}

#[tokio::test]
#[serial]
async fn built_watcher_uses_config_and_polls_app_database() {
    let app = make_test_app().await;
    AppConfig::set_alert_threshold(70.0);
    AppConfig::set_watcher_dedup("message");
    AppConfig::set_alert_webhook_url("");
    AppConfig::set_watcher_persist_cursor(false);

    let mut watcher = build_watcher(&app.state);
    AppConfig::reset();

    assert_eq!(watcher.config().thresholds.alert, 70.0);
    assert_eq!(watcher.config().dedup, DedupStrategy::Message);

    let report = watcher.poll_once().await.unwrap();
    assert_eq!(report.scanned, 0);
    assert_eq!(report.alerts_created, 0);
}
