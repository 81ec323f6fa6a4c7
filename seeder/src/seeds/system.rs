use crate::seed::Seeder;
use db::models::{account, monitored_system};
use fake::{Fake, faker::internet::en::IPv4};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

pub struct SystemSeeder;

const ROLES: [&str; 5] = ["web", "db", "cache", "worker", "edge"];
const LOCATIONS: [&str; 4] = ["Rack A1", "Rack B3", "Remote Node", "Cloud eu-west"];

#[async_trait::async_trait]
impl Seeder for SystemSeeder {
    async fn seed(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        let mut rng = StdRng::from_entropy();
        let accounts = account::Entity::find().all(db).await?;

        for acc in accounts {
            let existing = monitored_system::Model::find_for_account(db, acc.id).await?;
            if !existing.is_empty() {
                continue;
            }

            for n in 1..=rng.gen_range(1..=3i64) {
                let role = ROLES.choose(&mut rng).copied().unwrap_or("host");
                let name = format!("{role}-{:02}", acc.id * 10 + n);
                let ip: String = IPv4().fake();
                let location = LOCATIONS.choose(&mut rng).copied();

                monitored_system::Model::create(
                    db,
                    acc.id,
                    &name,
                    location,
                    Some(&ip),
                )
                .await?;
            }
        }

        Ok(())
    }
}
