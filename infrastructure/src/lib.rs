//! Infrastructure layer for foodtruck-research
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: HTTP clients for the text-generation providers, the
//! JSONL transcript logger, configuration file loading and report files.

pub mod config;
pub mod logging;
pub mod providers;
pub mod report;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAnthropicConfig, FileConfig, FileHttpConfig,
    FileModelConfig, FileOpenAiConfig, FileOutputConfig, FileProvidersConfig, FileRetryConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{
    AnthropicAdapter, ModelSelection, OpenAiAdapter, ProviderAdapter, ProviderError, ProviderKind,
    RoutingGateway, build_gateway, select_model,
};
pub use report::ReportWriter;
