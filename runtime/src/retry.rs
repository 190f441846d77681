//! Retry logic with exponential backoff.
//!
//! Remote document-store operations (writes, deletes, queries) can fail
//! transiently. Effect helpers wrap those operations with
//! [`retry_with_policy`] so failures are retried with backoff before they
//! are surfaced to the user as a visible error.

use std::future::Future;
use std::time::Duration;

/// Retry policy for handling transient failures
///
/// Implements exponential backoff with jitter to handle transient failures
/// gracefully without overwhelming the remote store.
///
/// # Example
///
/// ```
/// use vowsuite_runtime::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// // Or customize:
/// let policy = RetryPolicy::new()
///     .with_max_attempts(3)
///     .with_initial_delay(Duration::from_millis(50));
/// assert_eq!(policy.max_attempts(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt)
    max_attempts: u32,

    /// Initial delay before first retry
    initial_delay: Duration,

    /// Maximum delay between retries (caps exponential backoff)
    max_delay: Duration,

    /// Multiplier for exponential backoff (2.0 = double each time)
    backoff_multiplier: f64,
}

impl RetryPolicy {
    /// Create a new retry policy with default settings
    ///
    /// Defaults:
    /// - `max_attempts`: 3
    /// - `initial_delay`: 200 milliseconds
    /// - `max_delay`: 5 seconds
    /// - `backoff_multiplier`: 2.0 (exponential)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }

    /// Create a policy that never retries.
    ///
    /// Useful in tests that assert on first-failure behavior.
    #[must_use]
    pub const fn no_retries() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(0),
            max_delay: Duration::from_millis(0),
            backoff_multiplier: 1.0,
        }
    }

    /// Set maximum attempts (including the initial attempt)
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set initial delay before first retry
    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Set maximum delay between retries
    #[must_use]
    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set backoff multiplier for exponential backoff
    #[must_use]
    pub const fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Calculate delay for a given attempt number (0-indexed)
    ///
    /// Uses exponential backoff with jitter:
    /// `delay = min(initial_delay * multiplier^attempt, max_delay) * (0.5 + random(0.5))`
    ///
    /// Jitter spreads out retries from concurrent submissions.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        use rand::Rng;

        // Note: Cast is safe since max_attempts stays well within i32 range
        #[allow(clippy::cast_possible_wrap)]
        let base_delay_secs =
            self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32);

        let capped_secs = base_delay_secs.min(self.max_delay.as_secs_f64());

        let jitter = rand::thread_rng().gen_range(0.5..=1.0);
        Duration::from_secs_f64(capped_secs * jitter)
    }

    /// Get maximum number of attempts
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Check if another attempt is allowed after `attempt` attempts
    #[must_use]
    pub const fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Run an async operation with retries according to the policy.
///
/// The operation is retried with exponential backoff until it succeeds or
/// the policy's attempts are exhausted; the last error is returned.
///
/// # Arguments
///
/// - `policy`: Backoff configuration
/// - `operation`: Name for logging/metrics (e.g. `"add_guest"`)
/// - `f`: Async function to execute (called again on failure)
///
/// # Errors
///
/// Returns the last error once all attempts are exhausted.
///
/// # Example
///
/// ```no_run
/// use vowsuite_runtime::{RetryPolicy, retry::retry_with_policy};
///
/// # async fn example() -> Result<(), String> {
/// let policy = RetryPolicy::default();
/// let value = retry_with_policy(&policy, "fetch_budgets", || async {
///     Err::<u32, String>("store offline".to_string())
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_with_policy<F, Fut, T, Err>(
    policy: &RetryPolicy,
    operation: &str,
    mut f: F,
) -> Result<T, Err>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Err>>,
    Err: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(result) => {
                if attempt > 0 {
                    metrics::counter!(
                        "store.retry.success",
                        "operation" => operation.to_string()
                    )
                    .increment(1);
                    tracing::info!(
                        operation,
                        attempt,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(result);
            },
            Err(error) => {
                if !policy.should_retry(attempt + 1) {
                    metrics::counter!(
                        "store.retry.exhausted",
                        "operation" => operation.to_string()
                    )
                    .increment(1);
                    tracing::error!(
                        operation,
                        attempt,
                        error = %error,
                        "Operation failed after exhausting retries"
                    );
                    return Err(error);
                }

                let delay = policy.delay_for_attempt(attempt);
                metrics::counter!(
                    "store.retry.attempt",
                    "operation" => operation.to_string()
                )
                .increment(1);
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis(),
                    error = %error,
                    "Operation failed, retrying after delay"
                );

                tokio::time::sleep(delay).await;
                attempt += 1;
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn delay_grows_exponentially_up_to_cap() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(400))
            .with_backoff_multiplier(2.0);

        // Jitter multiplies by [0.5, 1.0], so bound from both sides.
        let d0 = policy.delay_for_attempt(0);
        assert!(d0 >= Duration::from_millis(50));
        assert!(d0 <= Duration::from_millis(100));

        let d3 = policy.delay_for_attempt(3);
        assert!(d3 <= Duration::from_millis(400));
    }

    #[test]
    fn should_retry_respects_max_attempts() {
        let policy = RetryPolicy::new().with_max_attempts(3);
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn no_retries_policy_allows_single_attempt() {
        let policy = RetryPolicy::no_retries();
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.should_retry(1));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let policy = RetryPolicy::new()
            .with_max_attempts(5)
            .with_initial_delay(Duration::from_millis(1));
        let calls = Arc::new(AtomicU32::new(0));

        let calls_clone = Arc::clone(&calls);
        let result = retry_with_policy(&policy, "flaky", move || {
            let calls = Arc::clone(&calls_clone);
            async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("transient".to_string())
                } else {
                    Ok(42_u32)
                }
            }
        })
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn returns_last_error_when_exhausted() {
        let policy = RetryPolicy::new()
            .with_max_attempts(2)
            .with_initial_delay(Duration::from_millis(1));
        let calls = Arc::new(AtomicU32::new(0));

        let calls_clone = Arc::clone(&calls);
        let result: Result<u32, String> = retry_with_policy(&policy, "always-down", move || {
            let calls = Arc::clone(&calls_clone);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("store offline".to_string())
            }
        })
        .await;

        assert_eq!(result, Err("store offline".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
