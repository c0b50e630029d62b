//! Chat delivery backends.
//!
//! # Responsibilities
//! - Deliver one message to one chat
//! - Report transport and API failures as `DeliveryError`
//!
//! # Design Decisions
//! - One attempt per call; retries belong to the dispatcher
//! - Backends share a single `reqwest::Client`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::schema::{NotifierConfig, NotifierKind};
use crate::notify::message::NotificationMessage;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure to deliver a notification.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid chat id '{0}'")]
    InvalidChatId(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bot api rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl DeliveryError {
    /// Errors that will fail the same way on every attempt.
    pub fn is_permanent(&self) -> bool {
        matches!(self, DeliveryError::InvalidChatId(_))
    }
}

/// A chat backend able to send text messages.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Backend name for logs and metrics.
    fn name(&self) -> &'static str;

    async fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError>;
}

/// Build the messenger selected by `config.kind`.
pub fn build_messenger(config: &NotifierConfig) -> Result<Arc<dyn Messenger>, DeliveryError> {
    let messenger: Arc<dyn Messenger> = match config.kind {
        NotifierKind::Log => Arc::new(LogMessenger),
        NotifierKind::Telegram => {
            let api_url = if config.api_url.is_empty() {
                TELEGRAM_API_URL
            } else {
                config.api_url.as_str()
            };
            Arc::new(TelegramMessenger::new(http_client()?, api_url, &config.token))
        }
        NotifierKind::Vk => Arc::new(VkTeamsMessenger::new(
            http_client()?,
            &config.api_url,
            &config.token,
        )),
    };
    Ok(messenger)
}

fn http_client() -> Result<reqwest::Client, DeliveryError> {
    Ok(reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?)
}

/// Telegram Bot API backend.
pub struct TelegramMessenger {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct TelegramPayload<'a> {
    chat_id: i64,
    text: &'a str,
}

impl TelegramMessenger {
    pub fn new(client: reqwest::Client, api_url: &str, token: &str) -> Self {
        let endpoint = format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), token);
        Self { client, endpoint }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError> {
        let chat_id: i64 = message
            .chat_id
            .parse()
            .map_err(|_| DeliveryError::InvalidChatId(message.chat_id.clone()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .json(&TelegramPayload { chat_id, text: &message.text })
            .send()
            .await?;

        check_response(response).await
    }
}

/// VK Teams Bot API backend.
pub struct VkTeamsMessenger {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl VkTeamsMessenger {
    pub fn new(client: reqwest::Client, api_url: &str, token: &str) -> Self {
        let endpoint = format!("{}/messages/sendText", api_url.trim_end_matches('/'));
        Self {
            client,
            endpoint,
            token: token.to_string(),
        }
    }
}

#[async_trait]
impl Messenger for VkTeamsMessenger {
    fn name(&self) -> &'static str {
        "vk"
    }

    async fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("token", self.token.as_str()),
                ("chatId", message.chat_id.as_str()),
                ("text", message.text.as_str()),
            ])
            .send()
            .await?;

        check_response(response).await
    }
}

/// Both bot APIs answer `{"ok": true, ...}` on success.
async fn check_response(response: reqwest::Response) -> Result<(), DeliveryError> {
    let status = response.status();
    let body = response.text().await?;

    let ok = status.is_success()
        && serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("ok").and_then(Value::as_bool))
            .unwrap_or(false);

    if ok {
        Ok(())
    } else {
        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

/// Writes messages to the log. Used when no chat backend is configured.
pub struct LogMessenger;

#[async_trait]
impl Messenger for LogMessenger {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError> {
        tracing::info!(chat_id = %message.chat_id, text = %message.text, "Notification");
        Ok(())
    }
}
