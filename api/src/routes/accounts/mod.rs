//! Account registry: `/api/accounts`.
//!
//! - `POST /accounts` → register an account
//! - `GET /accounts/{account_id}/systems` → list the account's systems
//! - `POST /accounts/{account_id}/systems` → register a system under it

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

pub fn accounts_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(post::create_account))
        .route(
            "/{account_id}/systems",
            get(get::list_systems).post(post::register_system),
        )
}
