use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::{account, monitored_system};
use sea_orm::EntityTrait;
use util::state::AppState;

use super::common::SystemResponse;
use crate::response::ApiResponse;

/// GET /api/accounts/{account_id}/systems
///
/// Systems owned by the account, in registration order.
///
/// - `200 OK` with a list of systems
/// - `404 Not Found` if the account does not exist
pub async fn list_systems(
    State(app_state): State<AppState>,
    Path(account_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();

    match account::Entity::find_by_id(account_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Vec<SystemResponse>>::error("Account not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    }

    match monitored_system::Model::find_for_account(db, account_id).await {
        Ok(systems) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                systems.into_iter().map(SystemResponse::from).collect(),
                "Systems retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
