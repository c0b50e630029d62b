//! Watchtower: HTTP endpoint watchdog with chat notifications.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod schedule;
pub mod watchdog;

pub use config::schema::WatchConfig;
pub use lifecycle::Shutdown;
