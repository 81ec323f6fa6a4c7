use axum::http::StatusCode;
use db::models::account;
use serde_json::json;

use crate::helpers::make_test_app;

#[tokio::test]
async fn get_system_returns_detail() {
    let app = make_test_app().await;
    let (account_id, system_id) = app.seed_system("web-01").await;

    let (status, json) = app.get(&format!("/api/systems/{system_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["system_id"], system_id);
    assert_eq!(json["data"]["account_id"], account_id);
    assert_eq!(json["data"]["system_name"], "web-01");
}

#[tokio::test]
async fn get_unknown_system_is_not_found() {
    let app = make_test_app().await;

    let (status, json) = app.get("/api/systems/42").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "System not found");
}

#[tokio::test]
async fn ownership_transfer_keeps_system_id_and_history() {
    let app = make_test_app().await;
    let (old_owner, system_id) = app.seed_system("web-01").await;
    let new_owner = account::Model::create(app.db(), "Night Shift", "night@example.com", None)
        .await
        .unwrap();
    app.seed_notification(old_owner, system_id, "earlier alert").await;

    let (status, json) = app
        .put(
            &format!("/api/systems/{system_id}/owner"),
            json!({ "account_id": new_owner.id }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["system_id"], system_id);
    assert_eq!(json["data"]["account_id"], new_owner.id);

    let (_, history) = app
        .get(&format!("/api/systems/{system_id}/notifications"))
        .await;
    assert_eq!(history["data"]["total"], 1);
}

#[tokio::test]
async fn ownership_transfer_to_unknown_account_is_not_found() {
    let app = make_test_app().await;
    let (_, system_id) = app.seed_system("web-01").await;

    let (status, json) = app
        .put(
            &format!("/api/systems/{system_id}/owner"),
            json!({ "account_id": 999 }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Account not found");
}

#[tokio::test]
async fn ingest_snapshot_scores_and_stores() {
    let app = make_test_app().await;
    let (_, system_id) = app.seed_system("web-01").await;

    let (status, json) = app
        .post(
            &format!("/api/systems/{system_id}/snapshots"),
            json!({
                "cpu_usage": 91.0,
                "memory_usage": 80.0,
                "disk_usage": 70.0,
                "network_latency": 55.0,
                "error_rate": 4.5
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["probability"], 90.0);
    assert_eq!(json["data"]["downtime_risk"], true);
    assert_eq!(json["data"]["estimated_time_to_downtime"], 15);
    assert!(json["data"]["snapshot_id"].as_i64().unwrap() > 0);
    assert!(json["data"]["prediction_id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn ingest_snapshot_rejects_out_of_range_values() {
    let app = make_test_app().await;
    let (_, system_id) = app.seed_system("web-01").await;

    let (status, json) = app
        .post(
            &format!("/api/systems/{system_id}/snapshots"),
            json!({
                "cpu_usage": 140.0,
                "memory_usage": 10.0,
                "disk_usage": 10.0,
                "network_latency": 10.0,
                "error_rate": 0.0
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "cpu_usage must be between 0 and 100");
}

#[tokio::test]
async fn ingest_snapshot_for_unknown_system_is_not_found() {
    let app = make_test_app().await;

    let (status, _) = app
        .post(
            "/api/systems/77/snapshots",
            json!({
                "cpu_usage": 1.0,
                "memory_usage": 1.0,
                "disk_usage": 1.0,
                "network_latency": 1.0,
                "error_rate": 0.0
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn notification_history_is_paginated_newest_first_and_read_only() {
    let app = make_test_app().await;
    let (account_id, system_id) = app.seed_system("web-01").await;
    for i in 0..3 {
        app.seed_notification(account_id, system_id, &format!("alert {i}"))
            .await;
    }

    let (status, json) = app
        .get(&format!(
            "/api/systems/{system_id}/notifications?page=1&per_page=2"
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["per_page"], 2);
    let rows = json["data"]["notifications"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["message"], "alert 2");
    assert_eq!(rows[0]["status"], "Unread");

    // History does not consume anything the agent poll would return
    let (_, unread) = app.get(&format!("/api/notifications/{system_id}")).await;
    assert_eq!(unread["notifications"].as_array().unwrap().len(), 3);
}
