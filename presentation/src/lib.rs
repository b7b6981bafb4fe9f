//! Presentation layer for foodtruck-research
//!
//! This crate contains the CLI definition, the report renderer, console
//! output and progress reporters.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, ReportFormat};
pub use config::OutputConfig;
pub use output::console::ConsoleFormatter;
pub use output::report::ReportRenderer;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
