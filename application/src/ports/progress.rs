//! Progress notification port
//!
//! Defines the interface for reporting progress during a research run.

use foodtruck_domain::{Location, ResearchState, Stage, ValidationFailure};
use std::time::Duration;

/// Callback for progress updates during a research run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, plain log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called once before the first stage
    fn on_pipeline_start(&self, location: &Location);

    /// Called when a stage starts
    fn on_stage_start(&self, stage: Stage);

    /// Called when a stage produced its record; `degraded` means fallback data
    fn on_stage_complete(&self, stage: Stage, degraded: bool);

    /// Called when a stage halted the pipeline
    fn on_stage_failed(&self, stage: Stage, reason: &str);

    /// Called once the run reached a terminal state
    fn on_pipeline_complete(&self, _state: &ResearchState) {}

    /// Called before waiting to retry a failed service call
    fn on_retry(&self, _stage: Stage, _attempt: u32, _delay: Duration, _error: &str) {}

    /// Called when a response failed validation and the fallback is used
    fn on_validation_fallback(&self, _stage: Stage, _failure: &ValidationFailure) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_pipeline_start(&self, _location: &Location) {}
    fn on_stage_start(&self, _stage: Stage) {}
    fn on_stage_complete(&self, _stage: Stage, _degraded: bool) {}
    fn on_stage_failed(&self, _stage: Stage, _reason: &str) {}
}
