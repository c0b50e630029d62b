//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config and environment
//! - Optionally mirror every event to Graylog over GELF/UDP
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level
//! - stderr output stays on when Graylog is enabled

use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Pause before reopening a failed GELF connection.
const GELF_RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Install the global subscriber. Later calls are no-ops.
///
/// Must run inside a tokio runtime when `graylog_address` is set.
pub fn init(log_level: &str, graylog_address: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("watchtower={log_level},tower_http={log_level}")));

    let (gelf, gelf_error) = match graylog_address.map(gelf_layer) {
        Some(Ok(layer)) => (Some(layer), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(gelf)
        .try_init();

    if let (Some(address), Some(e)) = (graylog_address, gelf_error) {
        tracing::error!(%address, error = ?e, "Graylog logging disabled");
    } else if let Some(address) = graylog_address {
        tracing::info!(%address, "Logging to stderr and Graylog");
    }
}

/// Build the GELF layer and spawn the task that owns its UDP socket.
fn gelf_layer(address: &str) -> Result<tracing_gelf::Logger, tracing_gelf::BuilderError> {
    let (logger, mut handle) = tracing_gelf::Logger::builder().connect_udp(address.to_string())?;

    tokio::spawn(async move {
        loop {
            let _ = handle.connect().await;
            tokio::time::sleep(GELF_RECONNECT_DELAY).await;
        }
    });

    Ok(logger)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_gelf_layer_builds_for_udp_endpoint() {
        assert!(gelf_layer("127.0.0.1:12201").is_ok());
    }

    #[tokio::test]
    async fn test_init_without_graylog_is_idempotent() {
        init("debug", None);
        init("info", None);
        tracing::info!("still logging");
    }
}
