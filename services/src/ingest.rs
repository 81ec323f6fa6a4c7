//! Snapshot ingestion: persist the readings, score them, log the prediction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use db::models::metric_snapshot::MetricReadings;
use db::store::TelemetryStore;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

use crate::scoring::{Prediction, Scorer, predict};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("system {0} not found")]
    SystemNotFound(i64),
    #[error("invalid reading: {0}")]
    InvalidReading(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub snapshot_id: i64,
    pub prediction_id: i64,
    pub prediction: Prediction,
}

#[derive(Clone)]
pub struct TelemetryIngest {
    store: Arc<dyn TelemetryStore>,
    scorer: Arc<dyn Scorer>,
}

impl TelemetryIngest {
    pub fn new(store: Arc<dyn TelemetryStore>, scorer: Arc<dyn Scorer>) -> Self {
        Self { store, scorer }
    }

    /// Appends the snapshot and the prediction derived from it. Both rows are
    /// committed when this returns, so the watcher may pick the prediction up
    /// on its next cycle.
    pub async fn ingest(
        &self,
        system_id: i64,
        readings: MetricReadings,
        captured_at: Option<DateTime<Utc>>,
    ) -> Result<IngestOutcome, IngestError> {
        validate(&readings)?;

        if self.store.get_system(system_id).await?.is_none() {
            return Err(IngestError::SystemNotFound(system_id));
        }

        let captured_at = captured_at.unwrap_or_else(Utc::now);
        let snapshot_id = self
            .store
            .append_snapshot(system_id, &readings, captured_at)
            .await?;

        let prediction = predict(self.scorer.as_ref(), &readings);
        let prediction_id = self
            .store
            .append_prediction(
                system_id,
                Some(prediction.probability),
                prediction.downtime_risk,
                prediction.estimated_time_to_downtime,
            )
            .await?;

        tracing::debug!(
            system_id,
            snapshot_id,
            prediction_id,
            probability = prediction.probability,
            "snapshot ingested"
        );

        Ok(IngestOutcome {
            snapshot_id,
            prediction_id,
            prediction,
        })
    }
}

fn validate(r: &MetricReadings) -> Result<(), IngestError> {
    let fields = [
        ("cpu_usage", r.cpu_usage),
        ("memory_usage", r.memory_usage),
        ("disk_usage", r.disk_usage),
        ("network_latency", r.network_latency),
        ("error_rate", r.error_rate),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(IngestError::InvalidReading(format!(
                "{name} must be a non-negative number"
            )));
        }
    }
    Ok(())
}
