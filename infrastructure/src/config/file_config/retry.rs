//! Retry configuration from TOML (`[retry]` section)

use foodtruck_domain::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff settings for calls to the text-generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Total attempts per stage call, including the first
    pub max_attempts: u32,
    /// Wait before the first retry, in milliseconds
    pub base_delay_ms: u64,
    /// Upper bound for any single wait, in milliseconds
    pub max_delay_ms: u64,
    /// Growth factor between consecutive waits
    pub exponential_base: f64,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 60_000,
            exponential_base: 2.0,
        }
    }
}

impl FileRetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
            self.exponential_base,
        )
    }
}
