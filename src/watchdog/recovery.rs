//! Recovery poller for a dead target.
//!
//! # Responsibilities
//! - Probe a dead target on a fixed cadence until it answers
//! - Announce recovery and wake the supervisor
//! - Pause for a long interval once the probe budget is spent
//!
//! # Design Decisions
//! - Runs as its own task so supervisor ticks never wait on it
//! - Reports exactly once on the wake-up channel: `true` on recovery,
//!   `false` when it gives up after the pause
//! - Aborted by the supervisor on shutdown; sleeps are not awaited

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

use crate::health::probe::HealthProbe;
use crate::notify::message::NotificationMessage;
use crate::notify::sink::NotificationSink;
use crate::watchdog::types::{RecoveryPolicy, Target};

pub struct RecoveryPoller {
    target: Target,
    chat_id: String,
    probe: HealthProbe,
    policy: RecoveryPolicy,
    sink: NotificationSink,
    wake: mpsc::Sender<bool>,
}

impl RecoveryPoller {
    pub fn new(
        target: Target,
        chat_id: String,
        probe: HealthProbe,
        policy: RecoveryPolicy,
        sink: NotificationSink,
        wake: mpsc::Sender<bool>,
    ) -> Self {
        Self {
            target,
            chat_id,
            probe,
            policy,
            sink,
            wake,
        }
    }

    pub fn spawn(self) -> JoinHandle<bool> {
        tokio::spawn(self.run())
    }

    /// Poll until recovery or until the post-pause probe fails.
    ///
    /// Returns whether the target recovered.
    pub async fn run(self) -> bool {
        tracing::info!(
            service = %self.target.name,
            probes = self.policy.dead_threshold,
            delay_secs = self.policy.dead_probe_delay.as_secs(),
            "Waiting for target to wake up"
        );

        for attempt in 1..=self.policy.dead_threshold {
            time::sleep(self.policy.dead_probe_delay).await;
            if self.check_and_report().await {
                return true;
            }
            tracing::debug!(service = %self.target.name, attempt, "Target still dead");
        }

        self.sink.send(NotificationMessage::dead_pause(
            &self.chat_id,
            &self.target.name,
            self.policy.dead_pause,
        ));
        tracing::warn!(
            service = %self.target.name,
            pause_secs = self.policy.dead_pause.as_secs(),
            "Recovery budget exhausted, pausing"
        );
        time::sleep(self.policy.dead_pause).await;

        if self.check_and_report().await {
            return true;
        }

        tracing::warn!(
            service = %self.target.name,
            "Target still offline after pause, waiting for next tick"
        );
        self.signal(false).await;
        false
    }

    async fn check_and_report(&self) -> bool {
        if !self.probe.check(&self.target).await {
            return false;
        }

        tracing::info!(service = %self.target.name, "Target is back online");
        self.sink
            .send(NotificationMessage::back_online(&self.chat_id, &self.target.name));
        self.signal(true).await;
        true
    }

    async fn signal(&self, recovered: bool) {
        if self.wake.send(recovered).await.is_err() {
            tracing::debug!(service = %self.target.name, "Supervisor gone, dropping wake-up");
        }
    }
}
