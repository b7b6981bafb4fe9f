//! Domain layer for foodtruck-research
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns and
//! performs no I/O.
//!
//! # Core Concepts
//!
//! ## Research pipeline
//!
//! A run researches one [`Location`] through four [`Stage`]s in fixed order:
//!
//! - **Market Research**: competition, customers and demand
//! - **Financial Analysis**: costs, revenue and funding
//! - **Operations Analysis**: permits, staffing and logistics
//! - **Business Recommendation**: go / no-go / conditional synthesis
//!
//! Each stage turns a prompt into a validated [`StageRecord`], or into a
//! deterministic fallback record when the response cannot be validated.
//!
//! ## Resilience
//!
//! [`ErrorClassification`] and [`RetryPolicy`] decide whether and when a
//! failed service call is attempted again.

pub mod config;
pub mod core;
pub mod prompt;
pub mod research;
pub mod resilience;
pub mod util;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{error::DomainError, location::Location, model::Model};
pub use prompt::{PromptTemplate, StagePrompt};
pub use research::{
    context::{comprehensive_context, format_context, format_money},
    records::{
        Amounts, CompetitorProfile, FinancialAnalysis, Level, MarketAnalysis, OperationsAnalysis,
        Recommendation, RecommendationKind, StaffingNeeds, StageRecord,
    },
    response::{AgentResponse, ResponseStatus},
    stage::Stage,
    state::{FailureDescriptor, PipelinePhase, PipelineStatus, ResearchState},
    validation::{Validate, ValidationFailure, extract_json_object, parse_record},
};
pub use resilience::{ErrorClassification, RetryPolicy};
