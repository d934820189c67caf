use crate::config::RetryConfig;
use crate::error::ProviderError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Upper bound on a single backoff sleep, jitter excluded
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Sleep before the attempt following `attempt` (1-based): `base * 2^(attempt-1)`,
/// capped at [`MAX_BACKOFF`]
fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 1u64
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u64::MAX);
    Duration::from_millis(base_ms.saturating_mul(factor)).min(MAX_BACKOFF)
}

/// Ask the provider on behalf of `persona_id` until it answers, fails with a
/// non-transient error, or `max_attempts` is used up.
pub async fn call_with_retry<F, Fut, T>(
    config: &RetryConfig,
    persona_id: &str,
    provider: &str,
    mut call: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let max_attempts = config.max_attempts.max(1);
    let base_ms = config.backoff_base_ms.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;

        let err = match call().await {
            Ok(value) => {
                if attempt > 1 {
                    info!("{}: {} answered on attempt {}", persona_id, provider, attempt);
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if !err.is_transient() {
            warn!("{}: {} call failed, not retrying: {}", persona_id, provider, err);
            return Err(err);
        }
        if attempt >= max_attempts {
            if max_attempts > 1 {
                warn!(
                    "{}: giving up on {} after {} attempts: {}",
                    persona_id, provider, attempt, err
                );
            }
            return Err(err);
        }

        let jitter = Duration::from_millis(rand::random::<u64>() % base_ms);
        let delay = backoff_delay(base_ms, attempt) + jitter;
        warn!(
            "{}: {} attempt {}/{} failed: {}. Retrying persona in {:?}",
            persona_id, provider, attempt, max_attempts, err, delay
        );
        sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            backoff_base_ms: 5,
        }
    }

    fn unavailable() -> ProviderError {
        ProviderError::Status {
            provider: "test",
            status: 503,
            body: "busy".to_string(),
        }
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        assert_eq!(backoff_delay(1000, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(1000, 2), Duration::from_millis(2000));
        assert_eq!(backoff_delay(1000, 3), Duration::from_millis(4000));
        assert_eq!(backoff_delay(1000, 10), MAX_BACKOFF);
        assert_eq!(backoff_delay(1000, 200), MAX_BACKOFF);
    }

    #[tokio::test]
    async fn test_first_answer_returned() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = call_with_retry(&config(3), "legal", "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ProviderError>("{}".to_string())
        })
        .await;

        assert_eq!(result.unwrap(), "{}");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failures_retried_until_answer() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = call_with_retry(&config(3), "legal", "test", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(ProviderError::Timeout(Duration::from_secs(1)))
            } else {
                Ok("done".to_string())
            }
        })
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<String, _> = call_with_retry(&config(2), "hr", "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(unavailable())
        })
        .await;

        assert!(matches!(result, Err(ProviderError::Status { status: 503, .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_client_errors_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: Result<String, _> = call_with_retry(&config(5), "hr", "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Status {
                provider: "test",
                status: 401,
                body: "bad key".to_string(),
            })
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_calls_once() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let zero = RetryConfig {
            max_attempts: 0,
            backoff_base_ms: 0,
        };

        let result: Result<String, _> = call_with_retry(&zero, "hr", "test", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(unavailable())
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
