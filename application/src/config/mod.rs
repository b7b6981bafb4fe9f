//! Application-level configuration.
//!
//! - [`ExecutionParams`] - how the pipeline calls the text-generation service

pub mod execution_params;

pub use execution_params::ExecutionParams;
