//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check target names are unique and URLs are probeable
//! - Validate value ranges (timeouts > 0, tick interval > 0)
//! - Check the notifier has what its backend needs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WatchConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{NotifierKind, WatchConfig};
use crate::schedule::calendar::{parse_date, parse_time, parse_weekday};

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no targets configured")]
    NoTargets,

    #[error("target #{index} has an empty name")]
    EmptyTargetName { index: usize },

    #[error("duplicate target name '{0}'")]
    DuplicateTarget(String),

    #[error("target '{name}' has invalid url '{url}': {reason}")]
    InvalidUrl {
        name: String,
        url: String,
        reason: String,
    },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("schedule.{field}: {reason}")]
    Schedule { field: &'static str, reason: String },

    #[error("notifier.{field} is required for the {kind:?} notifier")]
    MissingNotifierField {
        kind: NotifierKind,
        field: &'static str,
    },

    #[error("notifier.chat_id '{0}' is not a numeric Telegram chat id")]
    InvalidChatId(String),

    #[error("observability.graylog_address '{0}' is not a host:port address")]
    InvalidGraylogAddress(String),

    #[error("observability.ops_address '{0}' is not a socket address")]
    InvalidOpsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &WatchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_targets(config, &mut errors);

    if config.probe.timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "probe.timeout_secs" });
    }
    if config.schedule.probe_delay_secs == 0 {
        errors.push(ValidationError::Zero { field: "schedule.probe_delay_secs" });
    }

    validate_schedule(config, &mut errors);
    validate_notifier(config, &mut errors);

    if config.observability.ops_enabled
        && config.observability.ops_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidOpsAddress(
            config.observability.ops_address.clone(),
        ));
    }

    if let Some(address) = &config.observability.graylog_address {
        let port = address.rsplit_once(':').map(|(host, port)| (host, port.parse::<u16>()));
        if !matches!(port, Some((host, Ok(_))) if !host.is_empty()) {
            errors.push(ValidationError::InvalidGraylogAddress(address.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_targets(config: &WatchConfig, errors: &mut Vec<ValidationError>) {
    if config.targets.is_empty() {
        errors.push(ValidationError::NoTargets);
        return;
    }

    let mut seen = HashSet::new();
    for (index, target) in config.targets.iter().enumerate() {
        if target.name.trim().is_empty() {
            errors.push(ValidationError::EmptyTargetName { index });
        } else if !seen.insert(target.name.as_str()) {
            errors.push(ValidationError::DuplicateTarget(target.name.clone()));
        }

        let reason = match url::Url::parse(&target.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => None,
            Ok(url) => Some(format!("unsupported scheme '{}'", url.scheme())),
            Err(e) => Some(e.to_string()),
        };
        if let Some(reason) = reason {
            errors.push(ValidationError::InvalidUrl {
                name: target.name.clone(),
                url: target.url.clone(),
                reason,
            });
        }
    }
}

fn validate_schedule(config: &WatchConfig, errors: &mut Vec<ValidationError>) {
    let schedule = &config.schedule;

    match (&schedule.start_time, &schedule.end_time) {
        (Some(start), Some(end)) => {
            if let Err(e) = parse_time(start) {
                errors.push(ValidationError::Schedule { field: "start_time", reason: e.to_string() });
            }
            if let Err(e) = parse_time(end) {
                errors.push(ValidationError::Schedule { field: "end_time", reason: e.to_string() });
            }
        }
        (None, None) => {}
        (Some(_), None) => errors.push(ValidationError::Schedule {
            field: "end_time",
            reason: "must be set together with start_time".to_string(),
        }),
        (None, Some(_)) => errors.push(ValidationError::Schedule {
            field: "start_time",
            reason: "must be set together with end_time".to_string(),
        }),
    }

    for day in &schedule.days_off {
        if let Err(e) = parse_weekday(day) {
            errors.push(ValidationError::Schedule { field: "days_off", reason: e.to_string() });
        }
    }
    for day in &schedule.unusual_days {
        if let Err(e) = parse_date(day) {
            errors.push(ValidationError::Schedule { field: "unusual_days", reason: e.to_string() });
        }
    }
}

fn validate_notifier(config: &WatchConfig, errors: &mut Vec<ValidationError>) {
    let notifier = &config.notifier;
    if notifier.kind == NotifierKind::Log {
        return;
    }

    let mut require = |field: &'static str, value: &str| {
        if value.trim().is_empty() {
            errors.push(ValidationError::MissingNotifierField { kind: notifier.kind, field });
        }
    };
    require("token", &notifier.token);
    require("chat_id", &notifier.chat_id);
    if notifier.kind == NotifierKind::Vk {
        require("api_url", &notifier.api_url);
    }

    let chat_id = notifier.chat_id.trim();
    if notifier.kind == NotifierKind::Telegram
        && !chat_id.is_empty()
        && notifier.chat_id.parse::<i64>().is_err()
    {
        errors.push(ValidationError::InvalidChatId(notifier.chat_id.clone()));
    }
}
