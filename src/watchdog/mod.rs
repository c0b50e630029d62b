//! Watchdog subsystem.
//!
//! # Data Flow
//! ```text
//! Tick source
//!     → liveness channel (target name)
//!     → supervisor.rs (per-target state machine)
//!     → health probe
//!     → on Healthy→Dead: notice + spawn recovery.rs
//!
//! recovery.rs
//!     → probes on a fixed cadence
//!     → on recovery: notice + wake-up(true) back to the supervisor
//!     → on exhausted budget: pause notice, sleep, final probe
//! ```
//!
//! # Design Decisions
//! - One supervisor task per target, zero or one poller task beside it
//! - Supervisor state is task-local; all coordination is message passing
//! - Targets are fully independent of each other

pub mod recovery;
pub mod supervisor;
pub mod types;

pub use recovery::RecoveryPoller;
pub use supervisor::Supervisor;
pub use types::{RecoveryPolicy, Target, WatchState};
