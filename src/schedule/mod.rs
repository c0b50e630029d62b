//! Tick scheduling subsystem.
//!
//! # Data Flow
//! ```text
//! interval timer
//!     → calendar.rs (working hours / days off / unusual days)
//!     → ticker.rs (fan out target names)
//!     → per-target liveness channels
//! ```

pub mod calendar;
pub mod ticker;

pub use calendar::WorkingCalendar;
pub use ticker::Ticker;
