//! Agent-facing notification poll.
//!
//! `GET /api/notifications/{system_id}` returns every unread notification of
//! the system and marks each returned row read in the same transaction. The
//! response keeps the agent's bare shape:
//!
//! ```json
//! { "notifications": [
//!     { "notification_id": 4, "message": "...", "risk_level": "High",
//!       "sent_time": "2025-10-01 08:05:09" } ] }
//! ```
//!
//! Two agents polling the same system concurrently split the unread set
//! between them; no row is handed out twice.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use db::models::notification;
use db::store::{DbStore, NotificationStore};
use serde::Serialize;
use serde_json::json;
use util::state::AppState;

use crate::routes::common::format_timestamp;

pub fn notifications_routes() -> Router<AppState> {
    Router::new().route("/{system_id}", get(fetch_unread))
}

#[derive(Debug, Serialize)]
pub struct UnreadNotification {
    pub notification_id: i64,
    pub message: String,
    pub risk_level: String,
    pub sent_time: String,
}

impl From<notification::Model> for UnreadNotification {
    fn from(n: notification::Model) -> Self {
        Self {
            notification_id: n.id,
            message: n.message,
            risk_level: n.risk_level.to_string(),
            sent_time: format_timestamp(&n.sent_time),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UnreadBatch {
    pub notifications: Vec<UnreadNotification>,
}

/// GET /api/notifications/{system_id}
pub async fn fetch_unread(
    State(app_state): State<AppState>,
    Path(system_id): Path<i64>,
) -> Response {
    let store = DbStore::new(app_state.db_clone());

    match store.take_unread(system_id).await {
        Ok(rows) => {
            if !rows.is_empty() {
                tracing::debug!(system_id, count = rows.len(), "Delivered unread notifications");
            }
            let batch = UnreadBatch {
                notifications: rows.into_iter().map(UnreadNotification::from).collect(),
            };
            (StatusCode::OK, Json(batch)).into_response()
        }
        Err(e) => {
            tracing::error!(system_id, "Failed to fetch notifications: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
