//! Bounded retry of transient store failures.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use kartotek_core::Result;
use kartotek_core::error::{Error, StoreError};

/// Retry policy for transient transport failures.
///
/// Transient failures (connection refused, timeout) are retried with
/// exponential backoff up to `max_attempts`, then surfaced as
/// [`StoreError::Unavailable`]. Non-transient failures (validation,
/// not-found, bad queries) propagate immediately without retry.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy with the given attempt bound and initial delay.
    ///
    /// `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// The maximum number of attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run an operation under this policy.
    pub(crate) async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() => {
                    if attempt >= self.max_attempts {
                        return Err(Error::Store(StoreError::Unavailable {
                            message: e.to_string(),
                            attempts: attempt,
                        }));
                    }
                    let delay = self.base_delay * 2u32.saturating_pow(attempt - 1);
                    warn!(attempt, delay_ms = delay.as_millis() as u64, error = %e, "Transient store failure, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(250))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kartotek_core::error::TransportError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> Error {
        Error::Transport(TransportError::Connection {
            message: "connection refused".to_string(),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_until_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(10));

        let result = policy
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 { Err(transient()) } else { Ok(n) }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_becomes_unavailable() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(10));

        let result: Result<()> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            })
            .await;

        let err = result.unwrap_err();
        assert!(matches!(
            err,
            Error::Store(StoreError::Unavailable { attempts: 3, .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_transient_propagates_immediately() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::new(5, Duration::from_millis(10));

        let result: Result<()> = policy
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(Error::Store(StoreError::NotFound {
                        collection: "companies".to_string(),
                        id: "abc".to_string(),
                    }))
                }
            })
            .await;

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
