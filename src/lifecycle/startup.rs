//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration and build the probe transport and messenger
//! - Spawn the dispatcher, one watchdog per target, the ticker and the ops server
//! - Flip readiness once everything is running
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Consumers start before producers: dispatcher, then watchdogs, then ticker
//! - The metrics recorder is installed before any task records a value
//! - The ops listener is bound before readiness so `/ready` is never served early

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::loader::join;
use crate::config::schema::WatchConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::health::probe::HealthProbe;
use crate::health::transport::{HttpTransport, Transport, TransportError};
use crate::http::server::{OpsServer, OpsState};
use crate::lifecycle::shutdown::Shutdown;
use crate::notify::dispatcher::Dispatcher;
use crate::notify::messenger::{build_messenger, DeliveryError, Messenger};
use crate::notify::sink::NotificationSink;
use crate::observability::metrics;
use crate::schedule::calendar::{CalendarError, WorkingCalendar};
use crate::schedule::ticker::Ticker;
use crate::watchdog::supervisor::Supervisor;
use crate::watchdog::types::Target;

/// Fatal errors while bringing the watchtower up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("probe transport: {0}")]
    Transport(#[from] TransportError),

    #[error("messenger: {0}")]
    Messenger(#[from] DeliveryError),

    #[error("working calendar: {0}")]
    Calendar(#[from] CalendarError),

    #[error("failed to bind ops listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// Handle to a running watchtower.
pub struct Running {
    shutdown: Shutdown,
    tasks: Vec<JoinHandle<()>>,
    ready: Arc<AtomicBool>,
    ops_address: Option<SocketAddr>,
}

impl Running {
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Bound address of the ops server, if enabled.
    pub fn ops_address(&self) -> Option<SocketAddr> {
        self.ops_address
    }

    /// Signal every task and wait for them to exit.
    pub async fn shutdown(self) {
        self.ready.store(false, Ordering::Release);
        tracing::info!(
            listeners = self.shutdown.receiver_count(),
            tasks = self.tasks.len(),
            "Stopping tasks"
        );
        self.shutdown.trigger();

        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Task failed during shutdown");
            }
        }
        tracing::info!("All tasks stopped");
    }
}

/// Start the watchtower with the real HTTP transport and configured messenger.
pub async fn start(config: WatchConfig) -> Result<Running, StartupError> {
    validate_config(&config).map_err(StartupError::Validation)?;

    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config.probe.timeout())?);
    let messenger = build_messenger(&config.notifier)?;

    start_with(config, transport, messenger).await
}

/// Start the watchtower with the given transport and messenger.
pub async fn start_with(
    config: WatchConfig,
    transport: Arc<dyn Transport>,
    messenger: Arc<dyn Messenger>,
) -> Result<Running, StartupError> {
    let shutdown = Shutdown::new();
    let ready = Arc::new(AtomicBool::new(false));
    let calendar = WorkingCalendar::from_config(&config.schedule)?;
    let metrics_handle = if config.observability.ops_enabled {
        metrics::init_metrics()
    } else {
        None
    };
    let mut tasks = Vec::with_capacity(config.targets.len() + 3);

    // Dispatcher
    let (sink, notifications) = NotificationSink::channel();
    let dispatcher = Dispatcher::new(
        messenger,
        config.notifier.retry_count,
        config.notifier.retry_pause(),
    );
    tasks.push(tokio::spawn(dispatcher.run(notifications, shutdown.subscribe())));

    // Watchdogs
    let probe = HealthProbe::new(transport, config.probe.retry_policy());
    let recovery = config.recovery.policy();
    let mut ticker = Ticker::new(config.schedule.probe_delay(), calendar);

    for target_config in &config.targets {
        let target = Target::from(target_config);
        let liveness = ticker.register(&target.name);
        let supervisor = Supervisor::new(
            target,
            config.notifier.chat_id.clone(),
            probe.clone(),
            recovery,
            sink.clone(),
        );
        let shutdown_rx = shutdown.subscribe();
        tasks.push(tokio::spawn(async move {
            supervisor.run(liveness, shutdown_rx).await;
        }));
    }
    drop(sink);

    tracing::info!(
        targets = config.targets.len(),
        unhealthy_threshold = config.probe.unhealthy_threshold,
        dead_threshold = recovery.dead_threshold,
        "Watchdogs started"
    );

    // Ticker
    tasks.push(tokio::spawn(ticker.run(shutdown.subscribe())));

    // Ops server
    let mut ops_address = None;
    if config.observability.ops_enabled {
        let listener = TcpListener::bind(&config.observability.ops_address).await?;
        ops_address = Some(listener.local_addr()?);

        let server = OpsServer::new(OpsState::new(ready.clone(), metrics_handle));
        let shutdown_rx = shutdown.subscribe();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = server.run(listener, shutdown_rx).await {
                tracing::error!(error = %e, "Ops server failed");
            }
        }));
    }

    ready.store(true, Ordering::Release);
    tracing::info!("Watchtower ready");

    Ok(Running {
        shutdown,
        tasks,
        ready,
        ops_address,
    })
}
