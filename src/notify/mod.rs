//! Notification subsystem.
//!
//! # Data Flow
//! ```text
//! Supervisors / recovery pollers
//!     → sink.rs (unbounded mpsc, never blocks)
//!     → dispatcher.rs (single consumer, retry with pause)
//!     → messenger.rs (Telegram / VK Teams / log)
//! ```
//!
//! # Design Decisions
//! - Producers are fire-and-forget; delivery failures never reach the watchdog
//! - Order is preserved per producer, so per-target notices arrive in emission order

pub mod dispatcher;
pub mod message;
pub mod messenger;
pub mod sink;

pub use dispatcher::Dispatcher;
pub use message::NotificationMessage;
pub use messenger::{build_messenger, DeliveryError, Messenger};
pub use sink::NotificationSink;
