//! WebSocket entry point for `/ws/...`.
//!
//! - `/ws/systems/{system_id}/notifications` → push stream of
//!   `notification.created` events for one system

use axum::{
    Json, Router,
    extract::{Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use db::models::monitored_system;
use sea_orm::EntityTrait;
use util::state::AppState;
use util::ws::serve::{WsServerOptions, serve_topic};
use util::ws::system_notifications_topic;

use crate::response::{ApiResponse, Empty};

pub fn ws_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/systems/{system_id}/notifications",
            get(system_notifications_ws),
        )
        .with_state(app_state)
}

/// Upgrades to a socket subscribed to the system's notification topic.
///
/// - `404 Not Found` before upgrading when the system does not exist
pub async fn system_notifications_ws(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Path(system_id): Path<i64>,
) -> Response {
    match monitored_system::Entity::find_by_id(system_id)
        .one(app_state.db())
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Empty>::error("System not found")),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error(format!("Database error: {e}"))),
            )
                .into_response();
        }
    }

    let topic = system_notifications_topic(system_id);
    let manager = app_state.ws_clone();
    tracing::debug!(system_id, "Opening notification stream");

    ws.on_upgrade(move |socket| serve_topic(socket, manager, topic, WsServerOptions::default()))
}
