use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::{monitored_system, notification};
use sea_orm::EntityTrait;
use util::state::AppState;

use super::common::{NotificationHistory, NotificationResponse};
use crate::response::ApiResponse;
use crate::routes::accounts::common::SystemResponse;
use crate::routes::common::PageQuery;

/// GET /api/systems/{system_id}
///
/// - `200 OK` with the system
/// - `404 Not Found`
pub async fn get_system(
    State(app_state): State<AppState>,
    Path(system_id): Path<i64>,
) -> impl IntoResponse {
    match monitored_system::Entity::find_by_id(system_id)
        .one(app_state.db())
        .await
    {
        Ok(Some(system)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SystemResponse::from(system),
                "System retrieved successfully",
            )),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("System not found")),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// GET /api/systems/{system_id}/notifications?page=1&per_page=20
///
/// Full notification history for a system, newest first. Unlike the agent
/// poll at `/api/notifications/{system_id}` this never changes any status.
pub async fn notification_history(
    State(app_state): State<AppState>,
    Path(system_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let db = app_state.db();

    match monitored_system::Entity::find_by_id(system_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<NotificationHistory>::error("System not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    }

    let (page, per_page) = (query.page(), query.per_page());
    match notification::Model::history(db, system_id, page, per_page).await {
        Ok((rows, total)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                NotificationHistory {
                    notifications: rows.into_iter().map(NotificationResponse::from).collect(),
                    page,
                    per_page,
                    total,
                },
                "Notifications retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
