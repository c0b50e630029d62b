//! Outbound notification messages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A chat message addressed to a single chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub chat_id: String,
    pub text: String,
}

impl NotificationMessage {
    pub fn new(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
        }
    }

    /// Sent once when a healthy target fails a probe.
    pub fn unreachable(chat_id: &str, target: &str) -> Self {
        Self::new(chat_id, format!("❌ {target} is not responding ❌"))
    }

    /// Sent when a dead target passes a probe again.
    pub fn back_online(chat_id: &str, target: &str) -> Self {
        Self::new(chat_id, format!("✅ {target} is back online ✅"))
    }

    /// Sent when the recovery budget is spent and polling pauses for `pause`.
    pub fn dead_pause(chat_id: &str, target: &str, pause: Duration) -> Self {
        let minutes = pause.as_secs() / 60;
        Self::new(
            chat_id,
            format!("☠️ {target} is offline, pause watching it for {minutes} minutes ☠️"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_texts() {
        assert_eq!(
            NotificationMessage::unreachable("42", "svc-a"),
            NotificationMessage::new("42", "❌ svc-a is not responding ❌")
        );
        assert_eq!(
            NotificationMessage::back_online("42", "svc-a").text,
            "✅ svc-a is back online ✅"
        );
        assert_eq!(
            NotificationMessage::dead_pause("42", "svc-a", Duration::from_secs(30 * 60)).text,
            "☠️ svc-a is offline, pause watching it for 30 minutes ☠️"
        );
    }
}
