use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{DeriveActiveEnum, PaginatorTrait, QueryOrder, TransactionTrait};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An alert produced by the notification watcher.
///
/// At most one row exists per `(system_id, dedup_key)`; the unique index
/// `idx_notifications_system_dedup` enforces it. Rows only ever move from
/// `Unread` to `Read` and are never deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub system_id: i64,
    pub message: String,
    pub dedup_key: String,
    pub risk_level: RiskLevel,
    pub status: NotificationStatus,
    pub sent_time: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[strum(ascii_case_insensitive)]
pub enum RiskLevel {
    #[sea_orm(string_value = "Low")]
    Low,
    #[sea_orm(string_value = "Medium")]
    Medium,
    #[sea_orm(string_value = "High")]
    High,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[strum(ascii_case_insensitive)]
pub enum NotificationStatus {
    #[sea_orm(string_value = "Unread")]
    Unread,
    #[sea_orm(string_value = "Read")]
    Read,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::account::Entity",
        from = "Column::AccountId",
        to = "super::account::Column::Id"
    )]
    Account,

    #[sea_orm(
        belongs_to = "super::monitored_system::Entity",
        from = "Column::SystemId",
        to = "super::monitored_system::Column::Id"
    )]
    MonitoredSystem,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::monitored_system::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonitoredSystem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Everything the watcher decides about a notification before it exists.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub account_id: i64,
    pub system_id: i64,
    pub message: String,
    pub dedup_key: String,
    pub risk_level: RiskLevel,
    pub sent_time: DateTime<Utc>,
}

impl Model {
    pub async fn find_by_system_and_key<C: ConnectionTrait>(
        db: &C,
        system_id: i64,
        dedup_key: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::SystemId.eq(system_id))
            .filter(Column::DedupKey.eq(dedup_key))
            .one(db)
            .await
    }

    pub async fn find_by_system_and_message<C: ConnectionTrait>(
        db: &C,
        system_id: i64,
        message: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::SystemId.eq(system_id))
            .filter(Column::Message.eq(message))
            .one(db)
            .await
    }

    /// Inserts the notification unless one with the same `(system_id,
    /// dedup_key)` already exists.
    ///
    /// Returns `None` when the row was already there, including when a
    /// concurrent writer won the race between the caller's lookup and this
    /// insert.
    pub async fn insert_if_absent<C: ConnectionTrait>(
        db: &C,
        new: &NewNotification,
    ) -> Result<Option<Model>, DbErr> {
        let active = ActiveModel {
            account_id: Set(new.account_id),
            system_id: Set(new.system_id),
            message: Set(new.message.clone()),
            dedup_key: Set(new.dedup_key.clone()),
            risk_level: Set(new.risk_level),
            status: Set(NotificationStatus::Unread),
            sent_time: Set(new.sent_time),
            ..Default::default()
        };

        let inserted = Entity::insert(active)
            .on_conflict(
                OnConflict::columns([Column::SystemId, Column::DedupKey])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(db)
            .await;

        match inserted {
            Ok(res) => Entity::find_by_id(res.last_insert_id).one(db).await,
            Err(DbErr::RecordNotInserted) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Unread notifications for a system, oldest first.
    pub async fn list_unread<C: ConnectionTrait>(
        db: &C,
        system_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::SystemId.eq(system_id))
            .filter(Column::Status.eq(NotificationStatus::Unread))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Flips the given ids to `Read`. Rows already read are left alone.
    /// Returns how many rows changed.
    pub async fn mark_read<C: ConnectionTrait>(db: &C, ids: &[i64]) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }

        let res = Entity::update_many()
            .col_expr(Column::Status, Expr::value(NotificationStatus::Read.to_value()))
            .filter(Column::Id.is_in(ids.iter().copied()))
            .filter(Column::Status.eq(NotificationStatus::Unread))
            .exec(db)
            .await?;

        Ok(res.rows_affected)
    }

    /// Fetches a system's unread notifications and marks them read in one
    /// transaction.
    ///
    /// Each row is claimed with a conditional update (`status = 'Unread'`);
    /// only rows this call actually transitioned are returned, so a
    /// concurrent poller can never receive the same row.
    pub async fn take_unread<C: ConnectionTrait + TransactionTrait>(
        db: &C,
        system_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        let txn = db.begin().await?;

        let candidates = Self::list_unread(&txn, system_id).await?;
        let mut claimed = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let res = Entity::update_many()
                .col_expr(Column::Status, Expr::value(NotificationStatus::Read.to_value()))
                .filter(Column::Id.eq(candidate.id))
                .filter(Column::Status.eq(NotificationStatus::Unread))
                .exec(&txn)
                .await?;

            if res.rows_affected == 1 {
                claimed.push(Model {
                    status: NotificationStatus::Read,
                    ..candidate
                });
            }
        }

        txn.commit().await?;
        Ok(claimed)
    }

    /// Full history for a system, newest first. Returns the page and the
    /// total row count.
    pub async fn history<C: ConnectionTrait>(
        db: &C,
        system_id: i64,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<Model>, u64), DbErr> {
        let paginator = Entity::find()
            .filter(Column::SystemId.eq(system_id))
            .order_by_desc(Column::Id)
            .paginate(db, per_page.max(1));

        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((rows, total))
    }
}
