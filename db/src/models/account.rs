use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

/// Owner of one or more monitored systems.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::monitored_system::Entity")]
    MonitoredSystems,
}

impl Related<super::monitored_system::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonitoredSystems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C: ConnectionTrait>(
        db: &C,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Model, DbErr> {
        let active = ActiveModel {
            name: Set(name.trim().to_owned()),
            email: Set(email.trim().to_lowercase()),
            phone: Set(phone.map(str::to_owned)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        active.insert(db).await
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        db: &C,
        email: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_create_normalises_email() {
        let db = setup_test_db().await;

        let account = Model::create(&db, " Ops Team ", "Ops@Example.com", Some("555-0100"))
            .await
            .expect("Failed to create account");

        assert_eq!(account.name, "Ops Team");
        assert_eq!(account.email, "ops@example.com");

        let found = Model::find_by_email(&db, "OPS@example.com")
            .await
            .unwrap()
            .expect("account should be found");
        assert_eq!(found.id, account.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = setup_test_db().await;
        Model::create(&db, "A", "dup@example.com", None).await.unwrap();
        let second = Model::create(&db, "B", "dup@example.com", None).await;
        assert!(second.is_err());
    }
}
