//! Probe transport.
//!
//! # Responsibilities
//! - Perform a single `GET` against a target URL
//! - Classify failures (timeout, connection, request)
//!
//! # Design Decisions
//! - One-method capability trait so probes can run against scripted doubles
//! - No retries here; retry policy lives in `probe.rs`
//! - Certificate verification is off: monitored services often use internal CAs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Why a single probe request produced no status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to build http client: {0}")]
    Build(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_builder() {
            TransportError::Build(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Capability to fetch the status of a URL.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<StatusCode, TransportError>;
}

/// Real network transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .user_agent(concat!("watchtower/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<StatusCode, TransportError> {
        let response = self.client.get(url).send().await?;
        Ok(response.status())
    }
}
