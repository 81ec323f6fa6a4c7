use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};

/// One scorer verdict for a system. Ids increase with insertion order, which
/// is what the notification watcher's cursor relies on.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "prediction_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub system_id: i64,
    pub probability: Option<f64>,
    pub downtime_risk: bool,
    pub estimated_time_to_downtime: Option<i32>,
    pub created_at: DateTime<Utc>,
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
        probability: Option<f64>,
        downtime_risk: bool,
        estimated_time_to_downtime: Option<i32>,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            system_id: Set(system_id),
            probability: Set(probability),
            downtime_risk: Set(downtime_risk),
            estimated_time_to_downtime: Set(estimated_time_to_downtime),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active.insert(db).await
    }

    /// Predictions with `id > last_id`, ascending, at most `limit` of them.
    pub async fn list_since<C: ConnectionTrait>(
        db: &C,
        last_id: i64,
        limit: u64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Id.gt(last_id))
            .order_by_asc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    pub async fn latest_for_system<C: ConnectionTrait>(
        db: &C,
        system_id: i64,
        limit: u64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::SystemId.eq(system_id))
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{account, monitored_system};
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_list_since_is_ascending_and_exclusive() {
        let db = setup_test_db().await;
        let owner = account::Model::create(&db, "Ops", "ops@example.com", None)
            .await
            .unwrap();
        let system = monitored_system::Model::create(&db, owner.id, "api-01", None, None)
            .await
            .unwrap();

        let mut ids = Vec::new();
        for p in [10.0, 80.0, 95.0, 20.0] {
            let rec = Model::create(&db, system.id, Some(p), p > 60.0, None).await.unwrap();
            ids.push(rec.id);
        }

        let after_first = Model::list_since(&db, ids[0], 100).await.unwrap();
        assert_eq!(
            after_first.iter().map(|p| p.id).collect::<Vec<_>>(),
            ids[1..].to_vec()
        );

        let capped = Model::list_since(&db, 0, 2).await.unwrap();
        assert_eq!(capped.iter().map(|p| p.id).collect::<Vec<_>>(), ids[..2].to_vec());

        let newest = Model::latest_for_system(&db, system.id, 30).await.unwrap();
        assert_eq!(newest[0].id, ids[3]);
    }

    #[tokio::test]
    async fn test_probability_may_be_null() {
        let db = setup_test_db().await;
        let owner = account::Model::create(&db, "Ops", "ops@example.com", None)
            .await
            .unwrap();
        let system = monitored_system::Model::create(&db, owner.id, "api-01", None, None)
            .await
            .unwrap();

        let rec = Model::create(&db, system.id, None, false, None).await.unwrap();
        assert_eq!(rec.probability, None);
        assert_eq!(rec.estimated_time_to_downtime, None);
    }
}
