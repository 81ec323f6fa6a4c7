use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::store::DbStore;
use services::ingest::{IngestError, TelemetryIngest};
use services::scoring::Scorer;
use util::state::AppState;
use validator::Validate;

use super::common::{SnapshotRequest, SnapshotResponse};
use crate::response::ApiResponse;
use crate::routes::common::format_validation_errors;

/// POST /api/systems/{system_id}/snapshots
///
/// ### Request Body
/// ```json
/// {
///   "cpu_usage": 41.5,
///   "memory_usage": 63.0,
///   "disk_usage": 72.1,
///   "network_latency": 38.0,
///   "error_rate": 1.2
/// }
/// ```
///
/// Stores the snapshot, scores it and appends the resulting prediction. The
/// notification watcher picks the prediction up on its next cycle.
///
/// - `201 Created` with the snapshot and prediction ids
/// - `400 Bad Request` on out-of-range readings
/// - `404 Not Found` for an unknown system
pub async fn ingest_snapshot(
    State(app_state): State<AppState>,
    Extension(scorer): Extension<Arc<dyn Scorer>>,
    Path(system_id): Path<i64>,
    Json(req): Json<SnapshotRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<SnapshotResponse>::error(format_validation_errors(&errors))),
        );
    }

    let ingest = TelemetryIngest::new(Arc::new(DbStore::new(app_state.db_clone())), scorer);

    match ingest.ingest(system_id, req.readings(), req.captured_at).await {
        Ok(out) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SnapshotResponse {
                    snapshot_id: out.snapshot_id,
                    prediction_id: out.prediction_id,
                    probability: out.prediction.probability,
                    downtime_risk: out.prediction.downtime_risk,
                    estimated_time_to_downtime: out.prediction.estimated_time_to_downtime,
                },
                "Snapshot recorded",
            )),
        ),
        Err(IngestError::SystemNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("System not found")),
        ),
        Err(IngestError::InvalidReading(msg)) => {
            (StatusCode::BAD_REQUEST, Json(ApiResponse::error(msg)))
        }
        Err(IngestError::Db(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Database error: {e}"))),
        ),
    }
}
