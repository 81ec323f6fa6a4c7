use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

/// The five readings an agent reports per sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricReadings {
    pub cpu_usage: f64,       // 0..100
    pub memory_usage: f64,    // 0..100
    pub disk_usage: f64,      // 0..100
    pub network_latency: f64, // ms
    pub error_rate: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "metric_snapshots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub system_id: i64,
    pub captured_at: DateTime<Utc>,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub network_latency: f64,
    pub error_rate: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::monitored_system::Entity",
        from = "Column::SystemId",
        to = "super::monitored_system::Column::Id"
    )]
    MonitoredSystem,
}

impl Related<super::monitored_system::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonitoredSystem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        system_id: i64,
        readings: &MetricReadings,
        captured_at: DateTime<Utc>,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            system_id: Set(system_id),
            captured_at: Set(captured_at),
            cpu_usage: Set(readings.cpu_usage),
            memory_usage: Set(readings.memory_usage),
            disk_usage: Set(readings.disk_usage),
            network_latency: Set(readings.network_latency),
            error_rate: Set(readings.error_rate),
            ..Default::default()
        };

        active.insert(db).await
    }

    pub fn readings(&self) -> MetricReadings {
        MetricReadings {
            cpu_usage: self.cpu_usage,
            memory_usage: self.memory_usage,
            disk_usage: self.disk_usage,
            network_latency: self.network_latency,
            error_rate: self.error_rate,
        }
    }

    /// Newest first, by capture time then id.
    pub async fn latest_for_system<C: ConnectionTrait>(
        db: &C,
        system_id: i64,
        limit: u64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::SystemId.eq(system_id))
            .order_by_desc(Column::CapturedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    /// Most recently written snapshot across every system.
    pub async fn latest<C: ConnectionTrait>(db: &C) -> Result<Option<Model>, DbErr> {
        Entity::find().order_by_desc(Column::Id).one(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{account, monitored_system};
    use crate::test_utils::setup_test_db;
    use chrono::Duration;

    fn readings(error_rate: f64) -> MetricReadings {
        MetricReadings {
            cpu_usage: 40.0,
            memory_usage: 55.5,
            disk_usage: 70.0,
            network_latency: 42.0,
            error_rate,
        }
    }

    #[tokio::test]
    async fn test_latest_for_system_is_newest_first_and_capped() {
        let db = setup_test_db().await;
        let owner = account::Model::create(&db, "Ops", "ops@example.com", None)
            .await
            .unwrap();
        let system = monitored_system::Model::create(&db, owner.id, "db-01", None, None)
            .await
            .unwrap();

        let start = Utc::now() - Duration::minutes(40);
        for i in 0..35 {
            Model::create(&db, system.id, &readings(i as f64 / 10.0), start + Duration::minutes(i))
                .await
                .unwrap();
        }

        let latest = Model::latest_for_system(&db, system.id, 30).await.unwrap();
        assert_eq!(latest.len(), 30);
        assert!(latest.windows(2).all(|w| w[0].captured_at >= w[1].captured_at));
        assert_eq!(latest[0].readings(), readings(3.4));
    }

    #[tokio::test]
    async fn test_snapshot_for_unknown_system_rejected() {
        let db = setup_test_db().await;
        let res = Model::create(&db, 404, &readings(1.0), Utc::now()).await;
        assert!(res.is_err());
        assert!(Model::latest(&db).await.unwrap().is_none());
    }
}
