//! Configuration file loading for foodtruck-research
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables (`FOODTRUCK_*`, `MODEL_NAME`, `TEMPERATURE`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./foodtruck.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/foodtruck-research/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAnthropicConfig, FileConfig, FileHttpConfig, FileModelConfig,
    FileOpenAiConfig, FileOutputConfig, FileProvidersConfig, FileRetryConfig,
};
pub use loader::ConfigLoader;
