//! Bounded-retry health probe.
//!
//! # Responsibilities
//! - Run one health evaluation of a target URL
//! - Retry a failed check up to `unhealthy_threshold` extra times
//! - Collapse every failure mode into a boolean verdict
//!
//! # Design Decisions
//! - Only `200 OK` counts as healthy
//! - Errors never leave this module; callers only see `bool`
//! - The first success short-circuits remaining attempts

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::time;

use crate::health::transport::Transport;
use crate::observability::metrics;
use crate::watchdog::types::Target;

/// Retry policy for a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure. Zero makes the first failure decisive.
    pub unhealthy_threshold: u32,
    /// Sleep before each extra attempt.
    pub unhealthy_delay: Duration,
}

/// Probe `url` through `transport`, retrying per `policy`.
///
/// Returns `true` on the first healthy attempt and `false` once all
/// `1 + unhealthy_threshold` attempts have failed.
pub async fn probe<T>(transport: &T, url: &str, policy: &RetryPolicy) -> bool
where
    T: Transport + ?Sized,
{
    let attempts = policy.unhealthy_threshold.saturating_add(1);

    for attempt in 1..=attempts {
        if attempt > 1 && !policy.unhealthy_delay.is_zero() {
            time::sleep(policy.unhealthy_delay).await;
        }

        if check_once(transport, url, attempt).await {
            return true;
        }
    }

    tracing::debug!(url = %url, attempts, "All probe attempts failed");
    false
}

async fn check_once<T>(transport: &T, url: &str, attempt: u32) -> bool
where
    T: Transport + ?Sized,
{
    match transport.get(url).await {
        Ok(status) if status == StatusCode::OK => true,
        Ok(status) => {
            tracing::warn!(url = %url, attempt, status = %status, "Probe failed: unexpected status");
            false
        }
        Err(e) => {
            tracing::warn!(url = %url, attempt, error = %e, "Probe failed: transport error");
            false
        }
    }
}

/// A transport paired with its retry policy, shared by a supervisor and its poller.
#[derive(Clone)]
pub struct HealthProbe {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl HealthProbe {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Evaluate `target` once and record the verdict.
    pub async fn check(&self, target: &Target) -> bool {
        let healthy = probe(self.transport.as_ref(), &target.url, &self.policy).await;
        metrics::record_probe(&target.name, healthy);
        healthy
    }
}

impl std::fmt::Debug for HealthProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthProbe")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedTransport;
    use super::*;
    use crate::health::transport::TransportError;

    fn policy(threshold: u32) -> RetryPolicy {
        RetryPolicy {
            unhealthy_threshold: threshold,
            unhealthy_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_healthy_on_first_attempt() {
        let transport = ScriptedTransport::from_verdicts(&[], true);
        assert!(probe(&transport, "http://svc", &policy(3)).await);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_k_failures() {
        for k in 0..=3 {
            let mut verdicts = vec![false; k];
            verdicts.push(true);
            let transport = ScriptedTransport::from_verdicts(&verdicts, false);

            assert!(probe(&transport, "http://svc", &policy(3)).await, "k = {k}");
            assert_eq!(transport.calls(), k + 1, "k = {k}");
        }
    }

    #[tokio::test]
    async fn test_all_attempts_fail() {
        let transport = ScriptedTransport::from_verdicts(&[], false);
        assert!(!probe(&transport, "http://svc", &policy(2)).await);
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_zero_threshold_is_decisive() {
        let transport = ScriptedTransport::from_verdicts(&[false], true);
        assert!(!probe(&transport, "http://svc", &policy(0)).await);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_200_and_errors_are_failures() {
        let transport = ScriptedTransport::new(
            [
                Ok(StatusCode::NO_CONTENT),
                Ok(StatusCode::NOT_FOUND),
                Err(TransportError::Timeout),
                Err(TransportError::Connect("refused".into())),
            ],
            Ok(StatusCode::OK),
        );
        assert!(!probe(&transport, "http://svc", &policy(3)).await);
        assert_eq!(transport.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_attempts() {
        let transport = ScriptedTransport::from_verdicts(&[false, false], true);
        let policy = RetryPolicy {
            unhealthy_threshold: 2,
            unhealthy_delay: Duration::from_secs(2),
        };

        let started = time::Instant::now();
        assert!(probe(&transport, "http://svc", &policy).await);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_health_probe_checks_target_url() {
        let transport = Arc::new(ScriptedTransport::from_verdicts(&[true], false));
        let probe = HealthProbe::new(transport.clone(), policy(0));
        let target = Target::new("svc-a", "http://svc-a/health");

        assert!(probe.check(&target).await);
        assert!(!probe.check(&target).await);
        assert_eq!(transport.calls(), 2);
    }
}
