use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::make_test_app;

#[tokio::test]
async fn create_account_success() {
    let app = make_test_app().await;

    let (status, json) = app
        .post(
            "/api/accounts",
            json!({ "name": "Ops Team", "email": "Ops@Example.com", "phone": "555-0100" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["name"], "Ops Team");
    assert_eq!(json["data"]["email"], "ops@example.com");
    assert!(json["data"]["account_id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn create_account_rejects_bad_email() {
    let app = make_test_app().await;

    let (status, json) = app
        .post("/api/accounts", json!({ "name": "Ops", "email": "not-an-email" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "email must be a valid address");
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = make_test_app().await;
    let body = json!({ "name": "Ops", "email": "ops@example.com" });

    let (first, _) = app.post("/api/accounts", body.clone()).await;
    let (second, json) = app
        .post("/api/accounts", json!({ "name": "Other", "email": "OPS@example.com" }))
        .await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn register_and_list_systems() {
    let app = make_test_app().await;
    let (_, acc) = app
        .post("/api/accounts", json!({ "name": "Ops", "email": "ops@example.com" }))
        .await;
    let account_id = acc["data"]["account_id"].as_i64().unwrap();

    for name in ["web-01", "db-01"] {
        let (status, json) = app
            .post(
                &format!("/api/accounts/{account_id}/systems"),
                json!({ "system_name": name, "location": "rack 4", "ip_address": "10.0.0.4" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["account_id"], account_id);
        assert_eq!(json["data"]["ip_address"], "10.0.0.4");
    }

    let (status, json) = app.get(&format!("/api/accounts/{account_id}/systems")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["system_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["web-01", "db-01"]);
}

#[tokio::test]
async fn register_system_without_ip_and_peer_leaves_it_empty() {
    let app = make_test_app().await;
    let (account_id, _) = app.seed_system("seed").await;

    let (status, json) = app
        .post(
            &format!("/api/accounts/{account_id}/systems"),
            json!({ "system_name": "edge-01" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(json["data"]["ip_address"].is_null());
}

#[tokio::test]
async fn register_system_rejects_invalid_ip() {
    let app = make_test_app().await;
    let (account_id, _) = app.seed_system("seed").await;

    let (status, json) = app
        .post(
            &format!("/api/accounts/{account_id}/systems"),
            json!({ "system_name": "edge-01", "ip_address": "300.1.1.1" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "ip_address must be a valid IP address");
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let app = make_test_app().await;

    let (status, _) = app.get("/api/accounts/999/systems").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = app
        .post("/api/accounts/999/systems", json!({ "system_name": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Account not found");
}
