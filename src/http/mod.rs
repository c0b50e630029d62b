//! Ops HTTP subsystem.

pub mod server;

pub use server::{OpsServer, OpsState};
