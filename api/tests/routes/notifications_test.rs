use axum::http::StatusCode;

use crate::helpers::make_test_app;

#[tokio::test]
async fn unread_notifications_are_returned_once() {
    let app = make_test_app().await;
    let (account_id, system_id) = app.seed_system("web-01").await;
    let first = app.seed_notification(account_id, system_id, "first").await;
    let second = app.seed_notification(account_id, system_id, "second").await;

    let (status, json) = app.get(&format!("/api/notifications/{system_id}")).await;

    assert_eq!(status, StatusCode::OK);
    let rows = json["notifications"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["notification_id"], first);
    assert_eq!(rows[1]["notification_id"], second);
    assert_eq!(rows[0]["message"], "first");
    assert_eq!(rows[0]["risk_level"], "High");
    assert_eq!(rows[0]["sent_time"].as_str().unwrap().len(), 19);
    assert!(json.get("success").is_none());

    let (status, json) = app.get(&format!("/api/notifications/{system_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["notifications"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn notifications_are_scoped_to_the_system() {
    let app = make_test_app().await;
    let (a, sys_a) = app.seed_system("alpha").await;
    let (b, sys_b) = app.seed_system("beta").await;
    app.seed_notification(a, sys_a, "alpha alert").await;
    app.seed_notification(b, sys_b, "beta alert").await;

    let (_, json) = app.get(&format!("/api/notifications/{sys_a}")).await;
    let rows = json["notifications"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["message"], "alpha alert");

    let (_, json) = app.get(&format!("/api/notifications/{sys_b}")).await;
    assert_eq!(json["notifications"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_system_has_no_notifications() {
    let app = make_test_app().await;

    let (status, json) = app.get("/api/notifications/404").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["notifications"].as_array().unwrap().is_empty());
}
