//! Per-target watchdog supervisor.
//!
//! # States
//! - Healthy: ticks trigger a probe
//! - Dead: a recovery poller is running, ticks are ignored
//! - Dormant: the poller gave up after its pause, the next tick re-probes
//!
//! # State Transitions
//! ```text
//! Healthy + tick, probe fails   → Dead     (notice "not responding", spawn poller)
//! Dead    + wake-up(true)       → Healthy  (poller already sent "back online")
//! Dead    + wake-up(false)      → Dormant
//! Dormant + tick, probe passes  → Healthy  (notice "back online")
//! Dormant + tick, probe fails   → Dead     (spawn poller, no notice)
//! ```
//!
//! # Design Decisions
//! - The state is a local of the supervisor task; nothing else can touch it
//! - At most one poller per target: one is spawned only when leaving Healthy or Dormant
//! - Shutdown abandons in-flight probes and aborts the poller

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::health::probe::HealthProbe;
use crate::notify::message::NotificationMessage;
use crate::notify::sink::NotificationSink;
use crate::observability::metrics;
use crate::watchdog::recovery::RecoveryPoller;
use crate::watchdog::types::{RecoveryPolicy, Target, WatchState};

/// Watchdog for a single target.
pub struct Supervisor {
    target: Target,
    chat_id: String,
    probe: HealthProbe,
    recovery: RecoveryPolicy,
    sink: NotificationSink,
}

impl Supervisor {
    pub fn new(
        target: Target,
        chat_id: String,
        probe: HealthProbe,
        recovery: RecoveryPolicy,
        sink: NotificationSink,
    ) -> Self {
        Self {
            target,
            chat_id,
            probe,
            recovery,
            sink,
        }
    }

    /// Run until shutdown or until the liveness channel closes.
    ///
    /// Returns the final state.
    pub async fn run(
        self,
        mut liveness: mpsc::Receiver<String>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> WatchState {
        let (wake_tx, mut wake_rx) = mpsc::channel::<bool>(1);
        let mut state = WatchState::Healthy;
        let mut poller: Option<JoinHandle<bool>> = None;

        metrics::record_target_up(&self.target.name, true);
        tracing::info!(service = %self.target, "Watchdog starting");

        loop {
            tokio::select! {
                tick = liveness.recv() => {
                    let Some(name) = tick else {
                        tracing::info!(service = %self.target.name, "Liveness channel closed, watchdog exiting");
                        break;
                    };
                    if name != self.target.name {
                        continue;
                    }
                    if state == WatchState::Dead {
                        tracing::trace!(service = %self.target.name, "Tick ignored while recovery poller runs");
                        continue;
                    }

                    let healthy = tokio::select! {
                        healthy = self.probe.check(&self.target) => healthy,
                        _ = shutdown.recv() => {
                            tracing::info!(service = %self.target.name, "Watchdog received shutdown signal during probe");
                            break;
                        }
                    };

                    state = self.on_probe(state, healthy, &mut poller, &wake_tx);
                }
                Some(recovered) = wake_rx.recv() => {
                    state = self.on_wake(state, recovered, &mut poller);
                }
                _ = shutdown.recv() => {
                    tracing::info!(service = %self.target.name, "Watchdog received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        if let Some(handle) = poller.take() {
            handle.abort();
        }
        state
    }

    /// Apply a tick's probe verdict.
    fn on_probe(
        &self,
        state: WatchState,
        healthy: bool,
        poller: &mut Option<JoinHandle<bool>>,
        wake: &mpsc::Sender<bool>,
    ) -> WatchState {
        match (state, healthy) {
            (WatchState::Healthy, true) | (WatchState::Dead, _) => state,
            (WatchState::Healthy, false) => {
                tracing::warn!(service = %self.target, "Target is not responding");
                // Queue the notice before the poller exists.
                self.sink
                    .send(NotificationMessage::unreachable(&self.chat_id, &self.target.name));
                *poller = Some(self.spawn_poller(wake));
                metrics::record_target_up(&self.target.name, false);
                WatchState::Dead
            }
            (WatchState::Dormant, true) => {
                tracing::info!(service = %self.target.name, "Target is back online");
                self.sink
                    .send(NotificationMessage::back_online(&self.chat_id, &self.target.name));
                metrics::record_target_up(&self.target.name, true);
                WatchState::Healthy
            }
            (WatchState::Dormant, false) => {
                tracing::info!(service = %self.target.name, "Target still dead, restarting recovery poller");
                *poller = Some(self.spawn_poller(wake));
                WatchState::Dead
            }
        }
    }

    /// Apply a recovery poller's report.
    fn on_wake(
        &self,
        state: WatchState,
        recovered: bool,
        poller: &mut Option<JoinHandle<bool>>,
    ) -> WatchState {
        if state != WatchState::Dead {
            tracing::debug!(service = %self.target.name, ?state, "Stale wake-up ignored");
            return state;
        }

        *poller = None;
        if recovered {
            metrics::record_target_up(&self.target.name, true);
            WatchState::Healthy
        } else {
            WatchState::Dormant
        }
    }

    fn spawn_poller(&self, wake: &mpsc::Sender<bool>) -> JoinHandle<bool> {
        RecoveryPoller::new(
            self.target.clone(),
            self.chat_id.clone(),
            self.probe.clone(),
            self.recovery,
            self.sink.clone(),
            wake.clone(),
        )
        .spawn()
    }
}
