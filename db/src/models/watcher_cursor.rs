use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::TransactionTrait;
use sea_orm::entity::prelude::*;

/// Durable high-water mark for a named poller.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "watcher_cursors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub last_seen_id: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stored position for `name`, or 0 when it has never been saved.
    pub async fn load<C: ConnectionTrait>(db: &C, name: &str) -> Result<i64, DbErr> {
        Ok(Entity::find_by_id(name.to_owned())
            .one(db)
            .await?
            .map(|c| c.last_seen_id)
            .unwrap_or(0))
    }

    /// Upserts the cursor. Never moves a stored cursor backwards.
    pub async fn save<C: ConnectionTrait + TransactionTrait>(
        db: &C,
        name: &str,
        last_seen_id: i64,
    ) -> Result<i64, DbErr> {
        let txn = db.begin().await?;

        let stored = match Entity::find_by_id(name.to_owned()).one(&txn).await? {
            None => {
                ActiveModel {
                    name: Set(name.to_owned()),
                    last_seen_id: Set(last_seen_id),
                    updated_at: Set(Utc::now()),
                }
                .insert(&txn)
                .await?
                .last_seen_id
            }
            Some(existing) if existing.last_seen_id < last_seen_id => {
                let mut active: ActiveModel = existing.into();
                active.last_seen_id = Set(last_seen_id);
                active.updated_at = Set(Utc::now());
                active.update(&txn).await?.last_seen_id
            }
            Some(existing) => existing.last_seen_id,
        };

        txn.commit().await?;
        Ok(stored)
    }
}
