//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → WatchConfig (validated, immutable)
//!     → split into per-subsystem policies at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the target set never changes while running
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::WatchConfig;
pub use schema::{NotifierConfig, NotifierKind, ObservabilityConfig, ProbeConfig, RecoveryConfig, ScheduleConfig, TargetConfig};
