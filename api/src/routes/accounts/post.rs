use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::{Extensions, StatusCode},
    response::IntoResponse,
};
use db::models::{account, monitored_system};
use sea_orm::EntityTrait;
use util::state::AppState;
use validator::Validate;

use super::common::{AccountRequest, AccountResponse, SystemRequest, SystemResponse};
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;

/// POST /api/accounts
///
/// ### Request Body
/// ```json
/// { "name": "Ops Team", "email": "ops@example.com", "phone": "555-0100" }
/// ```
///
/// - `201 Created` with the account
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` if the email is already registered
pub async fn create_account(
    State(app_state): State<AppState>,
    Json(req): Json<AccountRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<AccountResponse>::error(format_validation_errors(&errors))),
        );
    }

    let db = app_state.db();

    match account::Model::find_by_email(db, &req.email).await {
        Ok(Some(_)) => {
            return (
                StatusCode::CONFLICT,
                Json(ApiResponse::error("An account with this email already exists")),
            );
        }
        Ok(None) => {}
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    }

    match account::Model::create(db, &req.name, &req.email, req.phone.as_deref()).await {
        Ok(account) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                AccountResponse::from(account),
                "Account registered successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to register account: {e}"))),
        ),
    }
}

/// POST /api/accounts/{account_id}/systems
///
/// ### Request Body
/// ```json
/// { "system_name": "web-01", "location": "rack 4", "ip_address": "10.0.0.4" }
/// ```
///
/// When `ip_address` is omitted the caller's peer address is recorded.
///
/// - `201 Created` with the system
/// - `400 Bad Request` on validation failure
/// - `404 Not Found` if the account does not exist
pub async fn register_system(
    State(app_state): State<AppState>,
    Path(account_id): Path<i64>,
    extensions: Extensions,
    Json(req): Json<SystemRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<SystemResponse>::error(format_validation_errors(&errors))),
        );
    }

    let db = app_state.db();

    match account::Entity::find_by_id(account_id).one(db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Account not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    }

    let peer_ip = extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());
    let ip_address = req.ip_address.clone().or(peer_ip);

    match monitored_system::Model::create(
        db,
        account_id,
        &req.system_name,
        req.location.as_deref(),
        ip_address.as_deref(),
    )
    .await
    {
        Ok(system) => {
            tracing::info!(
                system_id = system.id,
                account_id,
                "Registered system '{}'",
                system.system_name
            );
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(
                    SystemResponse::from(system),
                    "System registered successfully",
                )),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to register system: {e}"))),
        ),
    }
}
