use std::time::Duration;

use agent::client::ApiClient;
use agent::cycle::run_cycle;
use agent::source::SysinfoSource;
use anyhow::{Result, bail};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about = "Samples this host and reports it to the monitoring API")]
struct Args {
    /// Base URL of the API server
    #[arg(long, env = "AGENT_API_URL", default_value = "http://127.0.0.1:5000")]
    api_url: String,
    /// System to report as. Omit together with --account-id to register this host
    #[arg(long, env = "AGENT_SYSTEM_ID")]
    system_id: Option<i64>,
    /// Account to register this host under when no system id is given
    #[arg(long, env = "AGENT_ACCOUNT_ID")]
    account_id: Option<i64>,
    /// Location recorded when registering
    #[arg(long, env = "AGENT_LOCATION", default_value = "Remote Node")]
    location: String,
    /// Seconds between cycles
    #[arg(long, env = "AGENT_INTERVAL_SECONDS", default_value_t = 60)]
    interval_seconds: u64,
    /// Per-request timeout in seconds
    #[arg(long, env = "AGENT_TIMEOUT_SECONDS", default_value_t = 5)]
    timeout_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("agent=info")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();
    let client = ApiClient::new(
        &args.api_url,
        Duration::from_secs(args.timeout_seconds.max(1)),
    )?;

    let system_id = match (args.system_id, args.account_id) {
        (Some(id), _) => id,
        (None, Some(account_id)) => {
            let name = util::telemetry::host_name();
            let id = client
                .register_system(account_id, &name, Some(&args.location))
                .await?;
            info!(system_id = id, "Registered this host as '{name}'");
            id
        }
        (None, None) => bail!("either --system-id or --account-id is required"),
    };

    let interval = Duration::from_secs(args.interval_seconds.max(1));
    info!(
        system_id,
        api = %args.api_url,
        "Starting metric collection every {}s",
        interval.as_secs()
    );

    let source = SysinfoSource;
    loop {
        run_cycle(&source, &client, system_id).await;

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Agent stopping");
                break;
            }
            _ = tokio::time::sleep(interval) => {}
        }
    }

    Ok(())
}
