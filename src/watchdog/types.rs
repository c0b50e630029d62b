//! Watchdog data types.

use std::fmt;
use std::time::Duration;

/// A named endpoint under watch. Immutable for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    pub url: String,
}

impl Target {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.url)
    }
}

/// Cadence and budget of a recovery poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecoveryPolicy {
    /// Sleep before each recovery probe.
    pub dead_probe_delay: Duration,
    /// Recovery probes before pausing.
    pub dead_threshold: u32,
    /// Pause after the budget is spent, before the final probe.
    pub dead_pause: Duration,
}

/// Supervisor belief about its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Target answered its last probe. Ticks trigger probes.
    Healthy,
    /// A recovery poller owns probing. Ticks are ignored.
    Dead,
    /// Still dead, but the last poller gave up. The next tick re-probes.
    Dormant,
}
