//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness
//! - `/accounts` → account registry and system registration
//! - `/systems` → per-system detail, ownership, snapshot ingestion, history
//! - `/metrics`, `/predictions`, `/predict` → dashboard feeds
//! - `/notifications` → agent poll (fetch-and-mark-read)

use axum::Router;
use util::state::AppState;

use crate::routes::{
    accounts::accounts_routes,
    health::health_routes,
    notifications::notifications_routes,
    systems::systems_routes,
    telemetry::{metrics_routes, predict_routes, predictions_routes},
};

pub mod accounts;
pub mod common;
pub mod health;
pub mod notifications;
pub mod systems;
pub mod telemetry;

/// Builds the `/api` router. The scorer [`Extension`](axum::Extension) is
/// layered on by the caller.
pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/accounts", accounts_routes())
        .nest("/systems", systems_routes())
        .nest("/metrics", metrics_routes())
        .nest("/predictions", predictions_routes())
        .nest("/predict", predict_routes())
        .nest("/notifications", notifications_routes())
        .with_state(app_state)
}
