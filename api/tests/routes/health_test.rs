use axum::http::StatusCode;

use crate::helpers::make_test_app;

#[tokio::test]
async fn health_check_returns_ok_json() {
    let app = make_test_app().await;

    let (status, json) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], "OK");
    assert_eq!(json["message"], "Health check passed");
}
