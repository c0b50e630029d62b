//! Producer side of the notification queue.

use tokio::sync::mpsc;

use crate::notify::message::NotificationMessage;

/// Cloneable, non-blocking handle for enqueueing notifications.
///
/// Every supervisor and recovery poller holds a clone. Delivery happens in
/// the dispatcher; senders never wait for it.
#[derive(Debug, Clone)]
pub struct NotificationSink {
    tx: mpsc::UnboundedSender<NotificationMessage>,
}

impl NotificationSink {
    /// Create a sink and the receiver that drains it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue a message. Dropped with a warning if the receiver is gone.
    pub fn send(&self, message: NotificationMessage) {
        if let Err(e) = self.tx.send(message) {
            tracing::warn!(text = %e.0.text, "Notification dropped: dispatcher stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_preserves_order() {
        let (sink, mut rx) = NotificationSink::channel();
        let other = sink.clone();

        sink.send(NotificationMessage::new("1", "first"));
        other.send(NotificationMessage::new("1", "second"));

        assert_eq!(rx.recv().await.unwrap().text, "first");
        assert_eq!(rx.recv().await.unwrap().text, "second");
    }

    #[test]
    fn test_send_after_receiver_dropped_does_not_panic() {
        let (sink, rx) = NotificationSink::channel();
        drop(rx);
        sink.send(NotificationMessage::new("1", "lost"));
    }
}
