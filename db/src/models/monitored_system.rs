use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;

/// A host registered for monitoring.
///
/// The id is immutable once assigned. The only permitted mutation is an
/// ownership transfer; rows are never deleted while snapshots, predictions or
/// notifications reference them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "monitored_systems")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub system_name: String,
    pub location: Option<String>,
    pub ip_address: Option<String>,
    pub registered_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,

    #[sea_orm(has_many = "super::metric_snapshot::Entity")]
    MetricSnapshots,

    #[sea_orm(has_many = "super::prediction_record::Entity")]
    PredictionRecords,

    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::metric_snapshot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MetricSnapshots.def()
    }
}

impl Related<super::prediction_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PredictionRecords.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        account_id: i64,
        system_name: &str,
        location: Option<&str>,
        ip_address: Option<&str>,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            account_id: Set(account_id),
            system_name: Set(system_name.trim().to_owned()),
            location: Set(location.map(str::to_owned)),
            ip_address: Set(ip_address.map(str::to_owned)),
            registered_at: Set(Utc::now()),
            ..Default::default()
        };

        active.insert(db).await
    }

    pub async fn find_for_account<C: ConnectionTrait>(
        db: &C,
        account_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::AccountId.eq(account_id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Hands the system to another account. Nothing else about it changes.
    pub async fn transfer_owner<C: ConnectionTrait>(
        db: &C,
        system_id: i64,
        new_account_id: i64,
    ) -> Result<Model, DbErr> {
        let model = Entity::find_by_id(system_id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("System not found".to_string()))?;

        if super::account::Entity::find_by_id(new_account_id)
            .one(db)
            .await?
            .is_none()
        {
            return Err(DbErr::RecordNotFound("Account not found".to_string()));
        }

        let mut active: ActiveModel = model.into();
        active.account_id = Set(new_account_id);
        active.update(db).await
    }
}
