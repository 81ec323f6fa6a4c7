use crate::seed::Seeder;
use chrono::{Duration, Utc};
use db::models::metric_snapshot::{self, MetricReadings};
use db::models::{monitored_system, prediction_record};
use rand::{Rng, SeedableRng, rngs::StdRng};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use services::scoring::{HeuristicScorer, predict};

/// Back-fills a telemetry history for every system that has none yet.
pub struct TelemetrySeeder {
    pub points: i32,
    pub step: Duration,
    /// Chance that a point is an error-rate spike.
    pub spike_chance: f64,
}

impl Default for TelemetrySeeder {
    fn default() -> Self {
        Self {
            points: 48,
            step: Duration::minutes(30),
            spike_chance: 0.05,
        }
    }
}

#[async_trait::async_trait]
impl Seeder for TelemetrySeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut rng = StdRng::from_entropy();
        let systems = monitored_system::Entity::find().all(db).await?;
        let now = Utc::now();

        for system in systems {
            let recorded = metric_snapshot::Entity::find()
                .filter(metric_snapshot::Column::SystemId.eq(system.id))
                .count(db)
                .await?;
            if recorded > 0 {
                continue;
            }

            let txn = db.begin().await?;
            for i in (0..self.points).rev() {
                let spike = rng.gen_bool(self.spike_chance);
                let readings = MetricReadings {
                    cpu_usage: rng.gen_range(5.0..95.0),
                    memory_usage: rng.gen_range(20.0..90.0),
                    disk_usage: rng.gen_range(30.0..85.0),
                    network_latency: rng.gen_range(10.0..100.0),
                    error_rate: if spike {
                        rng.gen_range(3.5..5.0)
                    } else {
                        rng.gen_range(0.0..2.5)
                    },
                };

                metric_snapshot::Model::create(&txn, system.id, &readings, now - self.step * i)
                    .await?;

                let p = predict(&HeuristicScorer, &readings);
                prediction_record::Model::create(
                    &txn,
                    system.id,
                    Some(p.probability),
                    p.downtime_risk,
                    p.estimated_time_to_downtime,
                )
                .await?;
            }
            txn.commit().await?;
        }

        Ok(())
    }
}
