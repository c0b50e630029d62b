//! Stop signal shared by every long-running task.
//!
//! Supervisors, the ticker, the dispatcher and the ops server each hold a
//! receiver. One `trigger` ends them all; recovery pollers are not
//! subscribers and are aborted by their supervisor instead.

use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Returns without error when nobody listens any more.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Receivers not yet dropped.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
