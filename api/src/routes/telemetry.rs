//! Read-only telemetry feeds for dashboards.
//!
//! - `GET /metrics/{system_id}` → latest 30 snapshots, newest first
//! - `GET /predictions/{system_id}` → latest 30 predictions, newest first
//! - `GET /predict` → summary of the most recent snapshot of any system

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use db::models::{metric_snapshot, monitored_system, prediction_record};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use serde::Serialize;
use services::scoring::{Scorer, predict};
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::{FEED_LIMIT, format_timestamp};

pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/{system_id}", get(get_metrics))
}

pub fn predictions_routes() -> Router<AppState> {
    Router::new().route("/{system_id}", get(get_predictions))
}

pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/", get(latest_summary))
}

#[derive(Debug, Serialize)]
pub struct MetricResponse {
    pub snapshot_id: i64,
    pub timestamp: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_latency: f64,
    pub error_rate: f64,
}

impl From<metric_snapshot::Model> for MetricResponse {
    fn from(m: metric_snapshot::Model) -> Self {
        Self {
            snapshot_id: m.id,
            timestamp: format_timestamp(&m.captured_at),
            cpu_usage: m.cpu_usage,
            memory_usage: m.memory_usage,
            disk_usage: m.disk_usage,
            network_latency: m.network_latency,
            error_rate: m.error_rate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction_id: i64,
    pub probability: Option<f64>,
    pub downtime_risk: bool,
    pub estimated_time_to_downtime: Option<i32>,
    pub predicted_at: String,
}

impl From<prediction_record::Model> for PredictionResponse {
    fn from(p: prediction_record::Model) -> Self {
        Self {
            prediction_id: p.id,
            probability: p.probability,
            downtime_risk: p.downtime_risk,
            estimated_time_to_downtime: p.estimated_time_to_downtime,
            predicted_at: format_timestamp(&p.created_at),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct PredictSummary {
    pub system_id: i64,
    pub system_name: String,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_latency: f64,
    pub error_rate: f64,
    pub prediction: String,
    pub risk_probability: String,
    pub timestamp: String,
}

async fn system_exists(db: &DatabaseConnection, system_id: i64) -> Result<bool, DbErr> {
    Ok(monitored_system::Entity::find_by_id(system_id)
        .one(db)
        .await?
        .is_some())
}

/// GET /api/metrics/{system_id}
pub async fn get_metrics(
    State(app_state): State<AppState>,
    Path(system_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();

    match system_exists(db, system_id).await {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Vec<MetricResponse>>::error("System not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    }

    match metric_snapshot::Model::latest_for_system(db, system_id, FEED_LIMIT).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(MetricResponse::from).collect(),
                "Metrics retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// GET /api/predictions/{system_id}
pub async fn get_predictions(
    State(app_state): State<AppState>,
    Path(system_id): Path<i64>,
) -> impl IntoResponse {
    let db = app_state.db();

    match system_exists(db, system_id).await {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<Vec<PredictionResponse>>::error("System not found")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    }

    match prediction_record::Model::latest_for_system(db, system_id, FEED_LIMIT).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(PredictionResponse::from).collect(),
                "Predictions retrieved successfully",
            )),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}

/// GET /api/predict
///
/// Live tile for the dashboard: the newest snapshot across all systems,
/// scored on the spot.
///
/// - `200 OK`
/// - `404 Not Found` when no snapshot has been recorded yet
pub async fn latest_summary(
    State(app_state): State<AppState>,
    Extension(scorer): Extension<Arc<dyn Scorer>>,
) -> impl IntoResponse {
    let db = app_state.db();

    let latest = match metric_snapshot::Model::latest(db).await {
        Ok(Some(m)) => m,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::<PredictSummary>::error("No metrics recorded yet")),
            );
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    };

    let system_name = match monitored_system::Entity::find_by_id(latest.system_id)
        .one(db)
        .await
    {
        Ok(Some(s)) => s.system_name,
        Ok(None) => format!("System {}", latest.system_id),
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(format!("Database error: {e}"))),
            );
        }
    };

    let prediction = predict(scorer.as_ref(), &latest.readings());
    let summary = PredictSummary {
        system_id: latest.system_id,
        system_name,
        cpu_usage: latest.cpu_usage,
        memory_usage: latest.memory_usage,
        disk_usage: latest.disk_usage,
        network_latency: latest.network_latency,
        error_rate: latest.error_rate,
        prediction: if prediction.downtime_risk {
            "⚠ Downtime Risk".to_string()
        } else {
            "✅ Normal Operation".to_string()
        },
        risk_probability: format!("{:.2}%", prediction.probability),
        timestamp: format_timestamp(&latest.captured_at),
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(summary, "Latest metrics retrieved")),
    )
}
