//! muster: operator console for a fleet of remote agents.

mod app;
mod event;
mod ui;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "muster",
    version,
    about = "Observe a fleet of remote agents and dispatch ad-hoc commands"
)]
struct Cli {
    /// Base URL of the agent backend.
    #[arg(long, env = "MUSTER_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Auto-refresh interval in seconds.
    #[arg(long, env = "MUSTER_INTERVAL", default_value_t = 10)]
    interval: u64,

    /// Log filter (tracing env-filter syntax). Logs go to stderr; the TUI
    /// owns stdout.
    #[arg(long, env = "MUSTER_LOG", default_value = "muster=info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log_level).context("invalid --log-level filter")?)
        .with_writer(std::io::stderr)
        .init();

    if cli.interval == 0 {
        bail!("--interval must be positive");
    }
    tracing::info!(url = %cli.url, interval_secs = cli.interval, "Starting muster console");

    let terminal = ratatui::init();
    let result = app::App::new(&cli.url, cli.interval).run(terminal).await;
    ratatui::restore();
    result
}
