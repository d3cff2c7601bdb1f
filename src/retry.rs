use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::error::Error;

/// Longest wall-clock window a transient failure is retried for.
pub const MAX_WAIT: Duration = Duration::from_secs(10);

/// Pause between attempts. Fixed backoff, no jitter.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Retries `op` while it fails transiently, measuring elapsed time from
/// the first attempt.
///
/// Non-transient errors propagate immediately. Once `window` is spent,
/// the most recent transient error is wrapped in
/// [`Error::RetryExhausted`] with the cause preserved.
pub async fn with_retry<T, F, Fut>(window: Duration, mut op: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let start = Instant::now();
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() => {
                ::log::warn!("transient failure, will retry: {e}");
                if start.elapsed() > window {
                    ::log::error!("retry window of {window:?} spent, giving up: {e}");
                    return Err(Error::RetryExhausted {
                        window,
                        source: Box::new(e),
                    });
                }
                sleep(RETRY_INTERVAL).await;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn exhausts_window_under_persistent_transient_failure() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let start = Instant::now();

        let result: Result<(), Error> = with_retry(MAX_WAIT, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::ElementNotFound("tab button".into()))
            }
        })
        .await;

        let elapsed = start.elapsed();
        match result {
            Err(Error::RetryExhausted { window, source }) => {
                assert_eq!(window, MAX_WAIT);
                assert!(matches!(*source, Error::ElementNotFound(_)));
            }
            other => panic!("expected RetryExhausted, got {other:?}"),
        }
        // No earlier than the window, no later than window + one interval.
        assert!(elapsed >= MAX_WAIT, "gave up too early: {elapsed:?}");
        assert!(
            elapsed <= MAX_WAIT + RETRY_INTERVAL,
            "gave up too late: {elapsed:?}"
        );
        // Roughly one attempt per second across the window.
        let n = attempts.load(Ordering::SeqCst);
        assert!((10..=12).contains(&n), "unexpected attempt count: {n}");
    }

    #[tokio::test(start_paused = true)]
    async fn propagates_structural_failure_on_first_attempt() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);

        let result: Result<(), Error> = with_retry(MAX_WAIT, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::ParseStructure("container missing".into()))
            }
        })
        .await;

        assert!(matches!(result, Err(Error::ParseStructure(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_success_after_transient_failures() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let start = Instant::now();

        let result = with_retry(MAX_WAIT, move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(Error::ElementNotFound("list".into()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), 2 * RETRY_INTERVAL);
    }
}
