use colored::*;
use futures::FutureExt;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 80;

/// Applies every pending migration, printing one status line each.
///
/// Goes through `Migrator::up` one step at a time so the `seaql_migrations`
/// bookkeeping table stays in sync with what the API applies on boot.
pub async fn run_all_migrations(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("DB connection failed");

    println!("Running migrations...");
    let pending = migration::Migrator::get_pending_migrations(&db)
        .await
        .expect("Failed to read migration state");

    if pending.is_empty() {
        println!("{}", "Nothing to apply".dimmed());
        return;
    }

    for migration in pending {
        let label = format!("Applying {}", migration.name().bold());
        print_label(&label);

        let start = Instant::now();
        let result = std::panic::AssertUnwindSafe(migration::Migrator::up(&db, Some(1)))
            .catch_unwind()
            .await;
        report(result, start);
    }
}

/// Rolls back every applied migration, newest first.
pub async fn rollback_all(url: &str) {
    let db = sea_orm::Database::connect(url)
        .await
        .expect("DB connection failed");

    let applied = migration::Migrator::get_applied_migrations(&db)
        .await
        .expect("Failed to read migration state");

    println!("Rolling back {} migrations...", applied.len());
    for migration in applied.iter().rev() {
        let label = format!("Reverting {}", migration.name().bold());
        print_label(&label);

        let start = Instant::now();
        let result = std::panic::AssertUnwindSafe(migration::Migrator::down(&db, Some(1)))
            .catch_unwind()
            .await;
        report(result, start);
    }
}

fn print_label(label: &str) {
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(label.len()));
    print!("{}{} ", label, dots);
    let _ = io::stdout().flush();
}

fn report(result: std::thread::Result<Result<(), DbErr>>, start: Instant) {
    match result {
        Ok(Ok(())) => {
            let time_str = format!("({:.2?})", start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
        }
        Ok(Err(e)) => {
            println!("{}", "failed".red());
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(_) => {
            println!("{}", "panicked".red());
            std::process::exit(1);
        }
    }
}
