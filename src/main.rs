//! Watchtower (v1)
//!
//! Watches a fixed set of HTTP endpoints and reports outages to a chat.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────┐ name  ┌────────────┐ probe ┌──────────────┐
//!   │  ticker  │──────▶│ supervisor │──────▶│ health probe │──────▶ Target
//!   │(calendar)│       │(per target)│       │ (retry loop) │
//!   └──────────┘       └─────┬──────┘       └──────────────┘
//!                            │ spawn / wake-up       ▲
//!                            ▼                       │
//!                     ┌──────────────┐               │
//!                     │   recovery   │───────────────┘
//!                     │    poller    │
//!                     └──────┬───────┘
//!                            │ notices (supervisor + poller)
//!                            ▼
//!                     ┌──────────────┐       ┌────────────────┐
//!                     │  dispatcher  │──────▶│ Telegram / VK  │
//!                     └──────────────┘       └────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use watchtower::config::load_config;
use watchtower::lifecycle::{self, signals};
use watchtower::observability::logging;

#[derive(Parser)]
#[command(name = "watchtower")]
#[command(about = "Watch HTTP endpoints and report outages to a chat", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, env = "WATCHTOWER_CONFIG", default_value = "watchtower.toml")]
    config: PathBuf,

    /// Graylog GELF/UDP endpoint; overrides `observability.graylog_address`.
    #[arg(long, env = "GRAYLOG_ADDR")]
    graylog_address: Option<String>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(
        &config.observability.log_level,
        cli.graylog_address
            .as_deref()
            .or(config.observability.graylog_address.as_deref()),
    );

    if cli.check {
        println!("{}: configuration OK ({} targets)", cli.config.display(), config.targets.len());
        return Ok(());
    }

    tracing::info!(
        config = %cli.config.display(),
        targets = config.targets.len(),
        probe_delay_secs = config.schedule.probe_delay_secs,
        notifier = ?config.notifier.kind,
        "watchtower v0.1.0 starting"
    );

    let running = lifecycle::start(config).await?;

    let signal = signals::wait_for_signal().await?;
    tracing::info!(signal, "Shutdown signal received, attempting graceful shutdown");

    running.shutdown().await;

    tracing::info!("Shutdown complete");
    Ok(())
}
