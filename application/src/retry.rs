//! Retry executor
//!
//! Wraps a fallible async operation with the retry policy from the domain:
//! fatal errors surface at once, retryable ones are attempted again after an
//! exponential backoff, and when the budget runs out the last error is
//! returned unchanged.
//!
//! ```text
//! attempt 1 ──Err(retryable)──▶ sleep delay(0) ──▶ attempt 2 ──Err──▶ sleep delay(1) ──▶ ...
//!     │                                                │
//!     └──Err(fatal)──▶ return Err                      └──Ok──▶ return Ok
//! ```

use foodtruck_domain::{ErrorClassification, RetryPolicy};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Observes attempts and backoff waits.
///
/// Observation never changes the outcome of the call.
pub trait RetryObserver: Send + Sync {
    /// Called before each attempt (1-based)
    fn on_attempt(&self, _attempt: u32, _max_attempts: u32) {}

    /// Called before sleeping ahead of the next attempt
    fn on_backoff(&self, _attempt: u32, _delay: Duration, _error: &str) {}

    /// Called when the executor stops retrying and returns the error
    fn on_give_up(&self, _attempts: u32, _classification: ErrorClassification, _error: &str) {}
}

/// Observer that ignores everything
pub struct NoRetryObserver;

impl RetryObserver for NoRetryObserver {}

/// Applies a [`RetryPolicy`] to async operations
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Wrap `operation` so that each [`Retrying::call`] applies the policy.
    ///
    /// `operation` is invoked once per attempt and must build a fresh future
    /// each time.
    pub fn wrap<F>(&self, operation: F) -> Retrying<'_, F> {
        Retrying {
            policy: &self.policy,
            observer: &NoRetryObserver,
            operation,
        }
    }

    /// Run `operation` once under the policy
    pub async fn run<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.wrap(operation).call().await
    }
}

/// An operation wrapped with a retry policy
pub struct Retrying<'a, F> {
    policy: &'a RetryPolicy,
    observer: &'a dyn RetryObserver,
    operation: F,
}

impl<'a, F> Retrying<'a, F> {
    pub fn with_observer(mut self, observer: &'a dyn RetryObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Invoke the operation until it succeeds, fails fatally, or the attempt
    /// budget is spent.
    pub async fn call<Fut, T, E>(&mut self) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.policy.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            self.observer.on_attempt(attempt + 1, max_attempts);

            let error = match (self.operation)().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!("Succeeded after {} attempts", attempt + 1);
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            let message = error.to_string();
            let classification = ErrorClassification::classify(&message);

            if classification.is_fatal() {
                warn!("Non-retryable error, giving up: {}", message);
                self.observer
                    .on_give_up(attempt + 1, classification, &message);
                return Err(error);
            }

            if attempt + 1 >= max_attempts {
                warn!(
                    "All {} attempts failed, last error: {}",
                    max_attempts, message
                );
                self.observer
                    .on_give_up(attempt + 1, classification, &message);
                return Err(error);
            }

            let delay = self.policy.delay(attempt);
            warn!(
                "Attempt {}/{} failed: {}. Retrying in {:.2}s",
                attempt + 1,
                max_attempts,
                message,
                delay.as_secs_f64()
            );
            self.observer.on_backoff(attempt + 1, delay, &message);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    #[derive(Default)]
    struct RecordingObserver {
        attempts: Mutex<Vec<u32>>,
        delays: Mutex<Vec<Duration>>,
        gave_up: Mutex<Option<(u32, ErrorClassification)>>,
    }

    impl RetryObserver for RecordingObserver {
        fn on_attempt(&self, attempt: u32, _max_attempts: u32) {
            self.attempts.lock().unwrap().push(attempt);
        }

        fn on_backoff(&self, _attempt: u32, delay: Duration, _error: &str) {
            self.delays.lock().unwrap().push(delay);
        }

        fn on_give_up(&self, attempts: u32, classification: ErrorClassification, _error: &str) {
            *self.gave_up.lock().unwrap() = Some((attempts, classification));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_try() {
        let executor = RetryExecutor::default();
        let calls = &AtomicU32::new(0);
        let result: Result<u32, String> = executor
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_returns_last_error() {
        let executor = RetryExecutor::new(RetryPolicy::new(
            3,
            Duration::from_secs(1),
            Duration::from_secs(60),
            2.0,
        ));
        let calls = &AtomicU32::new(0);
        let observer = RecordingObserver::default();

        let result: Result<(), String> = executor
            .wrap(move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Err(format!("HTTP 503: overloaded #{}", n))
            })
            .with_observer(&observer)
            .call()
            .await;

        assert_eq!(result, Err("HTTP 503: overloaded #3".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(*observer.attempts.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(
            *observer.delays.lock().unwrap(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
        assert_eq!(
            *observer.gave_up.lock().unwrap(),
            Some((3, ErrorClassification::Retryable))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_error_aborts_immediately() {
        let executor = RetryExecutor::default();
        let calls = &AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), String> = executor
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("Rate limit check failed: 401 Unauthorized".to_string())
            })
            .await;

        assert_eq!(
            result,
            Err("Rate limit check failed: 401 Unauthorized".to_string())
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_errors() {
        let executor = RetryExecutor::default();
        let calls = &AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<&str, String> = executor
            .run(move || async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Err("connection error".to_string()),
                    1 => Err("request timeout".to_string()),
                    _ => Ok("done"),
                }
            })
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s + 2s of virtual backoff
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_policy_never_sleeps() {
        let executor = RetryExecutor::new(RetryPolicy::default().with_max_attempts(0));
        let calls = &AtomicU32::new(0);
        let start = Instant::now();

        let result: Result<(), String> = executor
            .run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("service unavailable".to_string())
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrapped_operation_can_be_called_again() {
        let executor = RetryExecutor::default();
        let calls = &AtomicU32::new(0);
        let mut wrapped = executor.wrap(move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok::<u32, String>(n)
        });

        assert_eq!(wrapped.call().await, Ok(0));
        assert_eq!(wrapped.call().await, Ok(1));
    }
}
