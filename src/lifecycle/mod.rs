//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Dispatcher → Watchdogs → Ticker → Ops server → Ready
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast → Abort pollers, stop loops → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: consumers before producers
//! - In-flight probes and sleeps are dropped, not awaited

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start, start_with, Running, StartupError};
