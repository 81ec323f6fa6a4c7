use std::net::SocketAddr;

use api::{app, startup::build_watcher};
use migration::{Migrator, MigratorTrait};
use services::scoring::scorer_from_name;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing_appender::rolling;
use util::{config, state::AppState, ws::WebSocketManager};

#[tokio::main]
async fn main() {
    // Load configuration and initialize logging
    let _log_guard = init_logging(&config::log_file(), &config::log_level());

    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database '{}': {e}", config::database_path());
            std::process::exit(1);
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        tracing::error!("Failed to apply migrations: {e}");
        std::process::exit(1);
    }

    let app_state = AppState::new(db, WebSocketManager::new());
    let scorer = scorer_from_name(&config::scorer());
    tracing::info!(scorer = scorer.name(), "Scorer selected");

    // Background notification watcher
    let shutdown = CancellationToken::new();
    let watcher_handle = match build_watcher(&app_state).spawn(shutdown.clone()) {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!("Notification watcher not started: {e}");
            None
        }
    };

    let app = app(app_state, scorer).layer(CorsLayer::very_permissive());

    let addr: SocketAddr = match format!("{}:{}", config::host(), config::port()).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!("Invalid listen address: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    let server_token = shutdown.clone();
    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("Shutdown requested");
        server_token.cancel();
    })
    .await;

    if let Err(e) = served {
        tracing::error!("Server error: {e}");
    }

    shutdown.cancel();
    if let Some(handle) = watcher_handle {
        let _ = handle.await;
    }
}

fn init_logging(log_file: &str, log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter =
        EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config::log_to_stdout() {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
