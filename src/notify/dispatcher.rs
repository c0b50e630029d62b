//! Notification dispatcher.
//!
//! # Responsibilities
//! - Drain the notification queue
//! - Deliver each message through the configured messenger
//! - Retry failed deliveries with a fixed pause
//!
//! # Design Decisions
//! - Messages are delivered one at a time, in queue order
//! - A message that exhausts its retries is logged and dropped
//! - Permanent errors (bad chat id) skip the remaining attempts
//! - Stops when every sink is dropped or on shutdown

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::time;

use crate::notify::message::NotificationMessage;
use crate::notify::messenger::Messenger;
use crate::observability::metrics;

pub struct Dispatcher {
    messenger: Arc<dyn Messenger>,
    retry_count: u32,
    retry_pause: Duration,
}

impl Dispatcher {
    pub fn new(messenger: Arc<dyn Messenger>, retry_count: u32, retry_pause: Duration) -> Self {
        Self {
            messenger,
            retry_count,
            retry_pause,
        }
    }

    pub async fn run(
        self,
        mut messages: mpsc::UnboundedReceiver<NotificationMessage>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!(messenger = self.messenger.name(), "Notification dispatcher starting");

        loop {
            tokio::select! {
                message = messages.recv() => {
                    let Some(message) = message else {
                        tracing::info!("All notification senders dropped, dispatcher exiting");
                        break;
                    };
                    tokio::select! {
                        _ = self.deliver(&message) => {}
                        _ = shutdown.recv() => {
                            tracing::info!("Dispatcher received shutdown signal during delivery");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Dispatcher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Try to deliver `message`, returning whether it got through.
    pub async fn deliver(&self, message: &NotificationMessage) -> bool {
        let attempts = self.retry_count.max(1);

        for attempt in 1..=attempts {
            match self.messenger.send(message).await {
                Ok(()) => {
                    metrics::record_notification(true);
                    return true;
                }
                Err(e) if e.is_permanent() => {
                    tracing::error!(
                        messenger = self.messenger.name(),
                        error = %e,
                        "Notification cannot be delivered, skipping"
                    );
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        messenger = self.messenger.name(),
                        attempt,
                        attempts,
                        error = %e,
                        "Failed to send notification"
                    );
                    if attempt < attempts {
                        time::sleep(self.retry_pause).await;
                    }
                }
            }
        }

        tracing::error!(text = %message.text, "Notification dropped");
        metrics::record_notification(false);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::messenger::DeliveryError;
    use crate::notify::sink::NotificationSink;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Fails the first `failures` sends, then records every message.
    struct FlakyMessenger {
        invalid_chat: bool,
        failures: AtomicU32,
        calls: AtomicU32,
        delivered: Mutex<Vec<String>>,
    }

    impl FlakyMessenger {
        fn new(failures: u32) -> Arc<Self> {
            Arc::new(Self {
                invalid_chat: false,
                failures: AtomicU32::new(failures),
                calls: AtomicU32::new(0),
                delivered: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Messenger for FlakyMessenger {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn send(&self, message: &NotificationMessage) -> Result<(), DeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.invalid_chat {
                return Err(DeliveryError::InvalidChatId(message.chat_id.clone()));
            }
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(DeliveryError::Rejected { status: 502, body: String::new() });
            }
            self.delivered.lock().unwrap().push(message.text.clone());
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_delivered() {
        let messenger = FlakyMessenger::new(2);
        let dispatcher = Dispatcher::new(messenger.clone(), 3, Duration::from_secs(5));

        assert!(dispatcher.deliver(&NotificationMessage::new("1", "hi")).await);
        assert_eq!(messenger.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_retry_count() {
        let messenger = FlakyMessenger::new(10);
        let dispatcher = Dispatcher::new(messenger.clone(), 3, Duration::from_secs(5));

        assert!(!dispatcher.deliver(&NotificationMessage::new("1", "hi")).await);
        assert_eq!(messenger.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_chat_id_is_not_retried() {
        let messenger = Arc::new(FlakyMessenger {
            invalid_chat: true,
            failures: AtomicU32::new(0),
            calls: AtomicU32::new(0),
            delivered: Mutex::new(Vec::new()),
        });
        let dispatcher = Dispatcher::new(messenger.clone(), 3, Duration::from_secs(5));

        let started = time::Instant::now();
        assert!(!dispatcher.deliver(&NotificationMessage::new("ops-chat", "hi")).await);
        assert_eq!(messenger.calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_zero_retry_count_still_attempts_once() {
        let messenger = FlakyMessenger::new(0);
        let dispatcher = Dispatcher::new(messenger.clone(), 0, Duration::ZERO);

        assert!(dispatcher.deliver(&NotificationMessage::new("1", "hi")).await);
        assert_eq!(messenger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_drains_queue_in_order_then_exits() {
        let messenger = FlakyMessenger::new(0);
        let dispatcher = Dispatcher::new(messenger.clone(), 1, Duration::ZERO);
        let (sink, rx) = NotificationSink::channel();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);

        sink.send(NotificationMessage::new("1", "down"));
        sink.send(NotificationMessage::new("1", "up"));
        drop(sink);

        dispatcher.run(rx, shutdown_rx).await;
        assert_eq!(*messenger.delivered.lock().unwrap(), vec!["down", "up"]);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let dispatcher = Dispatcher::new(FlakyMessenger::new(0), 1, Duration::ZERO);
        let (_sink, rx) = NotificationSink::channel();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let handle = tokio::spawn(dispatcher.run(rx, shutdown_rx));
        shutdown_tx.send(()).unwrap();
        time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }
}
