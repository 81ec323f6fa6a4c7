use std::sync::Arc;

use axum::{Extension, Router, middleware::from_fn};
use services::scoring::Scorer;
use util::state::AppState;

pub mod middleware;
pub mod response;
pub mod routes;
pub mod startup;
pub mod ws;

/// Assembles the full application: `/api` routes, `/ws` streams, request
/// logging and the scorer used by ingestion and the live summary.
pub fn app(app_state: AppState, scorer: Arc<dyn Scorer>) -> Router {
    Router::new()
        .nest("/api", routes::routes(app_state.clone()))
        .nest("/ws", ws::ws_routes(app_state.clone()))
        .layer(Extension(scorer))
        .layer(from_fn(middleware::log_request))
        .with_state(app_state)
}
