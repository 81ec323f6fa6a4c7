//! Turning a snapshot into a downtime probability.
//!
//! The model behind a [`Scorer`] is opaque here. A scorer may decline to
//! answer (returning `None`) or even panic; [`predict`] maps both to the
//! low-confidence fallback of 50% with no risk flag.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use db::models::metric_snapshot::MetricReadings;
use serde::Serialize;

/// Probability reported when the scorer is unavailable.
pub const FALLBACK_PROBABILITY: f64 = 50.0;

/// Minutes to downtime reported alongside a positive risk flag.
pub const RISK_ETA_MINUTES: i32 = 15;

/// Raw scorer verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    pub probability: f64,
    pub downtime_risk: bool,
}

/// What gets written to the prediction log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub probability: f64,
    pub downtime_risk: bool,
    pub estimated_time_to_downtime: Option<i32>,
    /// False when the fallback was used.
    pub scored: bool,
}

pub trait Scorer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Probability in `[0, 100]`, or `None` when no verdict is available.
    fn score(&self, readings: &MetricReadings) -> Option<Score>;
}

/// Dashboard heuristic: twenty points of probability per unit of error rate,
/// capped at 99.9, with the risk flag raised above an error rate of 3.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicScorer;

impl Scorer for HeuristicScorer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn score(&self, readings: &MetricReadings) -> Option<Score> {
        let error_rate = readings.error_rate;
        if !error_rate.is_finite() {
            return None;
        }
        Some(Score {
            probability: (error_rate.max(0.0) * 20.0).min(99.9),
            downtime_risk: error_rate > 3.0,
        })
    }
}

/// Stands in for a model that is not loaded.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableScorer;

impl Scorer for UnavailableScorer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn score(&self, _readings: &MetricReadings) -> Option<Score> {
        None
    }
}

/// Resolves the `SCORER` setting. Unknown names fall back to the heuristic.
pub fn scorer_from_name(name: &str) -> Arc<dyn Scorer> {
    match name.trim().to_ascii_lowercase().as_str() {
        "none" | "unavailable" => Arc::new(UnavailableScorer),
        "heuristic" => Arc::new(HeuristicScorer),
        other => {
            tracing::warn!(scorer = other, "unknown scorer, using heuristic");
            Arc::new(HeuristicScorer)
        }
    }
}

/// Scores `readings`, absorbing every scorer failure into the fallback.
pub fn predict(scorer: &dyn Scorer, readings: &MetricReadings) -> Prediction {
    let verdict = match catch_unwind(AssertUnwindSafe(|| scorer.score(readings))) {
        Ok(v) => v,
        Err(_) => {
            tracing::error!(scorer = scorer.name(), "scorer panicked");
            None
        }
    };

    match verdict {
        Some(Score {
            probability,
            downtime_risk,
        }) if probability.is_finite() => Prediction {
            probability: probability.clamp(0.0, 100.0),
            downtime_risk,
            estimated_time_to_downtime: downtime_risk.then_some(RISK_ETA_MINUTES),
            scored: true,
        },
        _ => {
            tracing::debug!(scorer = scorer.name(), "scorer unavailable, using fallback");
            Prediction {
                probability: FALLBACK_PROBABILITY,
                downtime_risk: false,
                estimated_time_to_downtime: None,
                scored: false,
            }
        }
    }
}
