//! Execution parameters - pipeline call control.
//!
//! [`ExecutionParams`] groups the static parameters that control how
//! [`RunResearchUseCase`](crate::use_cases::run_research::RunResearchUseCase)
//! talks to the service. These are application-layer concerns; values come
//! from the infrastructure config loader and are passed in explicitly.

use foodtruck_domain::RetryPolicy;
use std::time::Duration;

/// Service call parameters for one research run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionParams {
    /// Retry budget and backoff for every stage call.
    pub retry: RetryPolicy,
    /// Bytes of each raw response echoed to `debug!` logs.
    pub response_preview_bytes: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            response_preview_bytes: 200,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.retry = self.retry.with_max_attempts(max);
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.retry = self.retry.with_base_delay(delay);
        self
    }

    pub fn with_response_preview_bytes(mut self, bytes: usize) -> Self {
        self.response_preview_bytes = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_retry_policy() {
        let params = ExecutionParams::default();
        assert_eq!(params.retry.max_attempts(), 3);
        assert_eq!(params.retry.base_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_builders() {
        let params = ExecutionParams::default()
            .with_max_attempts(5)
            .with_base_delay(Duration::from_millis(250))
            .with_response_preview_bytes(80);
        assert_eq!(params.retry.max_attempts(), 5);
        assert_eq!(params.retry.base_delay(), Duration::from_millis(250));
        assert_eq!(params.response_preview_bytes, 80);
    }
}
