//! Health probe tests against real sockets.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use watchtower::health::{probe, HttpTransport, RetryPolicy, Transport, TransportError};

mod common;

fn policy(threshold: u32) -> RetryPolicy {
    RetryPolicy {
        unhealthy_threshold: threshold,
        unhealthy_delay: Duration::from_millis(50),
    }
}

fn transport() -> HttpTransport {
    HttpTransport::new(Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn test_healthy_backend() {
    let addr = common::start_programmable_backend(|| async { (200, "ok".into()) }).await;

    assert!(probe(&transport(), &format!("http://{}/health", addr), &policy(0)).await);
}

#[tokio::test]
async fn test_retries_until_backend_recovers() {
    let calls = Arc::new(AtomicU32::new(0));
    let c = calls.clone();
    let addr = common::start_programmable_backend(move || {
        let c = c.clone();
        async move {
            if c.fetch_add(1, Ordering::SeqCst) < 2 {
                (503, "Service Unavailable".into())
            } else {
                (200, "ok".into())
            }
        }
    })
    .await;

    assert!(probe(&transport(), &format!("http://{}/health", addr), &policy(2)).await);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_non_200_success_is_unhealthy() {
    let addr = common::start_programmable_backend(|| async { (204, String::new()) }).await;

    assert!(!probe(&transport(), &format!("http://{}/health", addr), &policy(1)).await);
}

#[tokio::test]
async fn test_unreachable_backend() {
    let addr = common::closed_port().await;
    let url = format!("http://{}/health", addr);

    let err = transport().get(&url).await.unwrap_err();
    assert!(matches!(err, TransportError::Connect(_)), "got {err:?}");
    assert!(!probe(&transport(), &url, &policy(1)).await);
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let addr = common::start_programmable_backend(|| async {
        tokio::time::sleep(Duration::from_secs(2)).await;
        (200, "late".into())
    })
    .await;
    let transport = HttpTransport::new(Duration::from_millis(200)).unwrap();

    let err = transport.get(&format!("http://{}/health", addr)).await.unwrap_err();
    assert_eq!(err, TransportError::Timeout);
}
