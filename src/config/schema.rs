//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the watchtower.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::health::probe::RetryPolicy;
use crate::watchdog::types::{RecoveryPolicy, Target};

/// Root configuration for the watchtower.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WatchConfig {
    /// Monitored endpoints, in the order they are ticked.
    pub targets: Vec<TargetConfig>,

    /// Health probe retry and transport settings.
    pub probe: ProbeConfig,

    /// Recovery poller cadence and budget.
    pub recovery: RecoveryConfig,

    /// Tick cadence and working calendar.
    pub schedule: ScheduleConfig,

    /// Chat delivery backend.
    pub notifier: NotifierConfig,

    /// Logging and ops endpoint settings.
    pub observability: ObservabilityConfig,
}

/// A single monitored endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Unique target identifier, also used in notifications.
    pub name: String,

    /// URL probed with `GET`.
    pub url: String,
}

impl From<&TargetConfig> for Target {
    fn from(config: &TargetConfig) -> Self {
        Target::new(config.name.clone(), config.url.clone())
    }
}

/// Health probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Extra attempts after a failed check before the target is declared unhealthy.
    pub unhealthy_threshold: u32,

    /// Delay between attempts in seconds.
    pub unhealthy_delay_secs: u64,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl ProbeConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            unhealthy_threshold: self.unhealthy_threshold,
            unhealthy_delay: Duration::from_secs(self.unhealthy_delay_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            unhealthy_threshold: 3,
            unhealthy_delay_secs: 2,
            timeout_secs: 3,
        }
    }
}

/// Recovery poller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Delay between recovery probes in seconds.
    pub dead_probe_delay_secs: u64,

    /// Recovery probes before the poller pauses.
    pub dead_threshold: u32,

    /// Pause after an exhausted budget, in minutes.
    pub dead_pause_mins: u64,
}

impl RecoveryConfig {
    pub fn policy(&self) -> RecoveryPolicy {
        RecoveryPolicy {
            dead_probe_delay: Duration::from_secs(self.dead_probe_delay_secs),
            dead_threshold: self.dead_threshold,
            dead_pause: Duration::from_secs(self.dead_pause_mins.saturating_mul(60)),
        }
    }
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            dead_probe_delay_secs: 60,
            dead_threshold: 10,
            dead_pause_mins: 30,
        }
    }
}

/// Tick source and working calendar configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Interval between ticks in seconds.
    pub probe_delay_secs: u64,

    /// Start of the working day ("HH:MM"). Both bounds must be set to enable gating.
    pub start_time: Option<String>,

    /// End of the working day ("HH:MM").
    pub end_time: Option<String>,

    /// Weekday names on which no ticks are sent (e.g. "Saturday").
    pub days_off: Vec<String>,

    /// Extra non-working dates ("YYYY-MM-DD").
    pub unusual_days: Vec<String>,
}

impl ScheduleConfig {
    pub fn probe_delay(&self) -> Duration {
        Duration::from_secs(self.probe_delay_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            probe_delay_secs: 5,
            start_time: None,
            end_time: None,
            days_off: Vec::new(),
            unusual_days: Vec::new(),
        }
    }
}

/// Supported chat delivery backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    Telegram,
    Vk,
    /// Writes notifications to the log instead of a chat.
    Log,
}

/// Notification delivery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifierConfig {
    pub kind: NotifierKind,

    /// Bot token.
    pub token: String,

    /// Bot API base URL. Required for VK Teams, optional override for Telegram.
    pub api_url: String,

    /// Chat that receives every notification.
    pub chat_id: String,

    /// Delivery attempts per message.
    pub retry_count: u32,

    /// Pause after a failed delivery attempt in seconds.
    pub retry_pause_secs: u64,
}

impl NotifierConfig {
    pub fn retry_pause(&self) -> Duration {
        Duration::from_secs(self.retry_pause_secs)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            kind: NotifierKind::Log,
            token: String::new(),
            api_url: String::new(),
            chat_id: String::new(),
            retry_count: 3,
            retry_pause_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Serve `/health`, `/ready` and `/metrics`.
    pub ops_enabled: bool,

    /// Ops endpoint bind address.
    pub ops_address: String,

    /// Graylog GELF UDP endpoint (`host:port`). Logs also go to stderr when set.
    pub graylog_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ops_enabled: true,
            ops_address: "0.0.0.0:9000".to_string(),
            graylog_address: None,
        }
    }
}
