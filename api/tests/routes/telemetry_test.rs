use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::{TestApp, make_test_app};

async fn ingest(app: &TestApp, system_id: i64, cpu: f64, error_rate: f64) {
    let (status, _) = app
        .post(
            &format!("/api/systems/{system_id}/snapshots"),
            json!({
                "cpu_usage": cpu,
                "memory_usage": 40.0,
                "disk_usage": 50.0,
                "network_latency": 20.0,
                "error_rate": error_rate
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn metrics_feed_is_newest_first_and_capped_at_thirty() {
    let app = make_test_app().await;
    let (_, system_id) = app.seed_system("web-01").await;
    for i in 0..32 {
        ingest(&app, system_id, i as f64, 0.0).await;
    }

    let (status, json) = app.get(&format!("/api/metrics/{system_id}")).await;

    assert_eq!(status, StatusCode::OK);
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 30);
    assert_eq!(rows[0]["cpu_usage"], 31.0);
    assert_eq!(rows[29]["cpu_usage"], 2.0);
    assert!(rows[0]["timestamp"].as_str().unwrap().len() == 19);
}

#[tokio::test]
async fn predictions_feed_lists_scored_records() {
    let app = make_test_app().await;
    let (_, system_id) = app.seed_system("web-01").await;
    ingest(&app, system_id, 10.0, 1.0).await;
    ingest(&app, system_id, 10.0, 4.0).await;

    let (status, json) = app.get(&format!("/api/predictions/{system_id}")).await;

    assert_eq!(status, StatusCode::OK);
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["probability"], 80.0);
    assert_eq!(rows[0]["downtime_risk"], true);
    assert_eq!(rows[1]["probability"], 20.0);
    assert_eq!(rows[1]["downtime_risk"], false);
    assert!(rows[1]["estimated_time_to_downtime"].is_null());
}

#[tokio::test]
async fn feeds_for_unknown_system_are_not_found() {
    let app = make_test_app().await;

    let (metrics, _) = app.get("/api/metrics/5").await;
    let (predictions, _) = app.get("/api/predictions/5").await;

    assert_eq!(metrics, StatusCode::NOT_FOUND);
    assert_eq!(predictions, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn predict_without_metrics_is_not_found() {
    let app = make_test_app().await;

    let (status, json) = app.get("/api/predict").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "No metrics recorded yet");
}

#[tokio::test]
async fn predict_summarises_latest_snapshot_across_systems() {
    let app = make_test_app().await;
    let (_, quiet) = app.seed_system("quiet").await;
    let (_, noisy) = app.seed_system("noisy").await;
    ingest(&app, noisy, 20.0, 4.2).await;
    ingest(&app, quiet, 12.0, 0.5).await;

    let (status, json) = app.get("/api/predict").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["system_name"], "quiet");
    assert_eq!(json["data"]["prediction"], "✅ Normal Operation");
    assert_eq!(json["data"]["risk_probability"], "10.00%");

    ingest(&app, noisy, 20.0, 4.2).await;
    let (_, json) = app.get("/api/predict").await;
    assert_eq!(json["data"]["system_name"], "noisy");
    assert_eq!(json["data"]["prediction"], "⚠ Downtime Risk");
    assert_eq!(json["data"]["risk_probability"], "84.00%");
}
