//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod http;
mod model;
mod output;
mod providers;
mod retry;

pub use http::FileHttpConfig;
pub use model::FileModelConfig;
pub use output::FileOutputConfig;
pub use providers::{FileAnthropicConfig, FileOpenAiConfig, FileProvidersConfig};
pub use retry::FileRetryConfig;

use crate::providers::ProviderKind;
use foodtruck_application::ExecutionParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A setting that loaded fine but cannot be used
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    #[error("model.name must not be empty")]
    EmptyModelName,

    #[error("model.temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f64),

    #[error("retry.max_attempts must be at least 1")]
    InvalidMaxAttempts,

    #[error("retry.base_delay_ms ({base}) must not exceed retry.max_delay_ms ({max})")]
    DelayBoundsInverted { base: u64, max: u64 },

    #[error("retry.exponential_base must be a finite number >= 1.0, got {0}")]
    InvalidExponentialBase(f64),

    #[error("unknown provider '{0}' in providers.default (expected 'anthropic' or 'openai')")]
    UnknownProvider(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model selection
    pub model: FileModelConfig,
    /// Backoff for service calls
    pub retry: FileRetryConfig,
    /// Provider endpoints and credentials
    pub providers: FileProvidersConfig,
    /// HTTP client settings
    pub http: FileHttpConfig,
    /// Report output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.model.parse_model().is_none() {
            issues.push(ConfigValidationError::EmptyModelName);
        }

        let temperature = self.model.temperature;
        if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
            issues.push(ConfigValidationError::InvalidTemperature(temperature));
        }

        if self.retry.max_attempts < 1 {
            issues.push(ConfigValidationError::InvalidMaxAttempts);
        }

        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            issues.push(ConfigValidationError::DelayBoundsInverted {
                base: self.retry.base_delay_ms,
                max: self.retry.max_delay_ms,
            });
        }

        let base = self.retry.exponential_base;
        if !base.is_finite() || base < 1.0 {
            issues.push(ConfigValidationError::InvalidExponentialBase(base));
        }

        if let Some(name) = &self.providers.default
            && name.parse::<ProviderKind>().is_err()
        {
            issues.push(ConfigValidationError::UnknownProvider(name.clone()));
        }

        issues
    }

    /// Application-level parameters derived from this configuration
    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default().with_retry(self.retry.to_policy())
    }

    /// The provider named in `providers.default`, if any and known
    pub fn default_provider(&self) -> Option<ProviderKind> {
        self.providers
            .default
            .as_deref()
            .and_then(|name| name.parse().ok())
    }
}
