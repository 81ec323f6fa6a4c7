//! Where an agent's readings come from.

use anyhow::Context;
use async_trait::async_trait;
use rand::Rng;
use serde::Serialize;
use util::telemetry::sample_host;

/// One reading as posted to `POST /api/systems/{id}/snapshots`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_latency: f64,
    pub error_rate: f64,
}

#[async_trait]
pub trait MetricSource: Send + Sync {
    async fn sample(&self) -> anyhow::Result<Reading>;
}

/// Real CPU, memory and disk utilisation from the host.
///
/// The host exposes no latency or error counters worth trusting, so those two
/// are simulated: latency uniformly in 10..100 ms and error rate in 0..5.
pub struct SysinfoSource;

#[async_trait]
impl MetricSource for SysinfoSource {
    async fn sample(&self) -> anyhow::Result<Reading> {
        let host = tokio::task::spawn_blocking(sample_host)
            .await
            .context("host sampling task failed")?;

        let mut rng = rand::thread_rng();
        Ok(Reading {
            cpu_usage: clamp_pct(host.cpu_usage),
            memory_usage: clamp_pct(host.memory_usage),
            disk_usage: clamp_pct(host.disk_usage),
            network_latency: rng.gen_range(10.0..100.0),
            error_rate: rng.gen_range(0.0..5.0),
        })
    }
}

/// Always returns the same reading. Used for dry runs and tests.
pub struct FixedSource(pub Reading);

#[async_trait]
impl MetricSource for FixedSource {
    async fn sample(&self) -> anyhow::Result<Reading> {
        Ok(self.0)
    }
}

// sysinfo can overshoot 100 on some platforms
fn clamp_pct(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 }
}
