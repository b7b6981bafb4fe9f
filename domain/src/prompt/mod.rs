//! Prompt domain
//!
//! Templates for the instructions sent at each stage of the research pipeline.

mod template;

pub use template::{PromptTemplate, StagePrompt};
