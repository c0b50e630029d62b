//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Supervisor tick / recovery poll
//!     → probe.rs (bounded retry loop)
//!     → transport.rs (single GET)
//!     → bool verdict back to the caller
//! ```
//!
//! # Design Decisions
//! - The transport is injected so probes are testable without a network
//! - A probe blocks only the task that runs it
//! - Verdicts are booleans; no error crosses this boundary

pub mod probe;
pub mod transport;

pub use probe::{probe, HealthProbe, RetryPolicy};
pub use transport::{HttpTransport, Transport, TransportError};
