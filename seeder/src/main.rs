use crate::seed::{Seeder, run_seeder};
use crate::seeds::{account::AccountSeeder, system::SystemSeeder, telemetry::TelemetrySeeder};
use colored::*;
use migration::{Migrator, MigratorTrait};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {e}", "Failed to connect to database:".red());
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        eprintln!("{} {e}", "Failed to apply migrations:".red());
        std::process::exit(1);
    }

    for (seeder, name) in [
        (Box::new(AccountSeeder) as Box<dyn Seeder + Send + Sync>, "Account"),
        (Box::new(SystemSeeder), "MonitoredSystem"),
        (Box::new(TelemetrySeeder::default()), "Telemetry"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
