use crate::seed::Seeder;
use db::models::account::Model;
use fake::{
    Fake,
    faker::{internet::en::SafeEmail, name::en::Name},
};
use sea_orm::{DatabaseConnection, DbErr};

pub struct AccountSeeder;

#[async_trait::async_trait]
impl Seeder for AccountSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        // Fixed demo account
        if Model::find_by_email(db, "demo@example.com").await?.is_none() {
            Model::create(db, "Demo Operator", "demo@example.com", Some("555-0100")).await?;
        }

        // Random accounts; email collisions are simply skipped
        for _ in 0..4 {
            let name: String = Name().fake();
            let email: String = SafeEmail().fake();
            let phone = format!("555-{:04}", fastrand::u32(..10_000));
            let _ = Model::create(db, &name, &email, Some(&phone)).await;
        }

        Ok(())
    }
}
