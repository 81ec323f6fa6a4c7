use chrono::Utc;
use db::models::metric_snapshot::MetricReadings;
use db::models::notification::{NewNotification, RiskLevel};
use db::models::{account, monitored_system};
use db::store::{CursorStore, DbStore, NotificationStore, TelemetryStore};
use db::test_utils::setup_test_db;

async fn store_with_system() -> (DbStore, monitored_system::Model) {
    let db = setup_test_db().await;
    let owner = account::Model::create(&db, "Ops", "ops@example.com", None)
        .await
        .unwrap();
    let system = monitored_system::Model::create(&db, owner.id, "TestSystem", None, None)
        .await
        .unwrap();
    (DbStore::new(db), system)
}

#[tokio::test]
async fn telemetry_appends_are_visible_in_order() {
    let (store, system) = store_with_system().await;

    let readings = MetricReadings {
        cpu_usage: 12.0,
        memory_usage: 30.0,
        disk_usage: 50.0,
        network_latency: 20.0,
        error_rate: 0.5,
    };
    let snapshot_id = store
        .append_snapshot(system.id, &readings, Utc::now())
        .await
        .unwrap();
    assert!(snapshot_id > 0);

    let p1 = store.append_prediction(system.id, Some(10.0), false, None).await.unwrap();
    let p2 = store.append_prediction(system.id, Some(90.0), true, Some(15)).await.unwrap();
    assert!(p2 > p1);

    let since = store.list_predictions_since(0, 10).await.unwrap();
    assert_eq!(since.iter().map(|p| p.id).collect::<Vec<_>>(), vec![p1, p2]);
    assert_eq!(since[1].estimated_time_to_downtime, Some(15));

    assert!(store.get_system(system.id).await.unwrap().is_some());
    assert!(store.get_system(system.id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn concurrent_take_unread_never_hands_out_a_row_twice() {
    let (store, system) = store_with_system().await;

    for i in 0..6 {
        let message = format!("alert {i}");
        store
            .insert_if_absent(&NewNotification {
                account_id: system.account_id,
                system_id: system.id,
                dedup_key: message.clone(),
                message,
                risk_level: RiskLevel::Medium,
                sent_time: Utc::now(),
            })
            .await
            .unwrap();
    }

    let (a, b) = futures::join!(store.take_unread(system.id), store.take_unread(system.id));
    let (a, b) = (a.unwrap(), b.unwrap());

    let mut ids: Vec<i64> = a.iter().chain(b.iter()).map(|n| n.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6);
    assert_eq!(a.len() + b.len(), 6);
}

#[tokio::test]
async fn cursor_store_round_trips() {
    let (store, _) = store_with_system().await;
    assert_eq!(store.load_cursor("notifications").await.unwrap(), 0);
    store.save_cursor("notifications", 42).await.unwrap();
    assert_eq!(store.save_cursor("notifications", 3).await.unwrap(), 42);
    assert_eq!(store.load_cursor("notifications").await.unwrap(), 42);
}
