//! Application layer for foodtruck-research
//!
//! This crate contains the pipeline use case, the retry executor, port
//! definitions, and application configuration. It depends only on the
//! domain layer.

pub mod config;
pub mod ports;
pub mod retry;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    progress::{NoProgress, ProgressNotifier},
};
pub use retry::{NoRetryObserver, RetryExecutor, RetryObserver, Retrying};
pub use use_cases::run_research::{
    PipelineOutcome, RunResearchError, RunResearchInput, RunResearchUseCase,
};
