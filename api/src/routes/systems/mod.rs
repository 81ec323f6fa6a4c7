//! Per-system endpoints: `/api/systems/{system_id}`.

use axum::{
    Router,
    routing::{get, post, put},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;
pub mod put;

pub fn systems_routes() -> Router<AppState> {
    Router::new()
        .route("/{system_id}", get(get::get_system))
        .route("/{system_id}/owner", put(put::transfer_owner))
        .route("/{system_id}/snapshots", post(post::ingest_snapshot))
        .route("/{system_id}/notifications", get(get::notification_history))
}
