use anyhow::{Context, Result};
use clap::Parser;

use paymxnts_cli::client::ApiClient;
use paymxnts_cli::commands::{self, Cli};
use paymxnts_cli::session_cache::SessionCache;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    let client = ApiClient::new(&cli.server).context("Failed to create HTTP client")?;
    let cache = SessionCache::default_location()?;
    tracing::debug!(server = %client.base_url(), cache = %cache.path().display(), "Starting");

    let mut stdout = std::io::stdout();
    commands::run(cli.command, &client, &cache, &mut stdout).await
}

/// Initialize tracing subscriber for logging (stderr, so output stays clean).
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}
