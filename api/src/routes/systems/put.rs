use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::monitored_system;
use sea_orm::DbErr;
use util::state::AppState;
use validator::Validate;

use super::common::OwnerRequest;
use crate::response::ApiResponse;
use crate::routes::accounts::common::SystemResponse;
use crate::routes::common::format_validation_errors;

/// PUT /api/systems/{system_id}/owner
///
/// ### Request Body
/// ```json
/// { "account_id": 2 }
/// ```
///
/// Moves the system to another account. The system id, its telemetry and its
/// notification history are untouched.
///
/// - `200 OK` with the updated system
/// - `404 Not Found` if either the system or the target account is missing
pub async fn transfer_owner(
    State(app_state): State<AppState>,
    Path(system_id): Path<i64>,
    Json(req): Json<OwnerRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<SystemResponse>::error(format_validation_errors(&errors))),
        );
    }

    match monitored_system::Model::transfer_owner(app_state.db(), system_id, req.account_id).await
    {
        Ok(system) => {
            tracing::info!(system_id, account_id = req.account_id, "System ownership transferred");
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    SystemResponse::from(system),
                    "Ownership transferred successfully",
                )),
            )
        }
        Err(DbErr::RecordNotFound(msg)) => {
            (StatusCode::NOT_FOUND, Json(ApiResponse::error(msg)))
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to transfer ownership: {e}"))),
        ),
    }
}
