use std::sync::Arc;

use api::app;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::Utc;
use db::models::{account, monitored_system, notification};
use db::models::notification::{NewNotification, RiskLevel};
use db::test_utils::setup_test_db;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use services::scoring::HeuristicScorer;
use tower::ServiceExt;
use util::{state::AppState, ws::WebSocketManager};

/// Router over a fresh in-memory database, plus direct handles for seeding.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub async fn make_test_app() -> TestApp {
    let db = setup_test_db().await;
    let state = AppState::new(db, WebSocketManager::new());
    let router = app(state.clone(), Arc::new(HeuristicScorer));
    TestApp { router, state }
}

impl TestApp {
    pub fn db(&self) -> &DatabaseConnection {
        self.state.db()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Seeds an account with one system and returns `(account_id, system_id)`.
    pub async fn seed_system(&self, name: &str) -> (i64, i64) {
        let email = format!("{}@example.com", name.to_lowercase());
        let acc = account::Model::create(self.db(), "Ops", &email, None)
            .await
            .unwrap();
        let sys = monitored_system::Model::create(self.db(), acc.id, name, None, None)
            .await
            .unwrap();
        (acc.id, sys.id)
    }

    pub async fn seed_notification(&self, account_id: i64, system_id: i64, message: &str) -> i64 {
        let new = NewNotification {
            account_id,
            system_id,
            message: message.to_string(),
            dedup_key: message.to_string(),
            risk_level: RiskLevel::High,
            sent_time: Utc::now(),
        };
        notification::Model::insert_if_absent(self.db(), &new)
            .await
            .unwrap()
            .unwrap()
            .id
    }
}
