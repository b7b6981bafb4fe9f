//! Progress reporting for research execution

use colored::Colorize;
use foodtruck_application::ProgressNotifier;
use foodtruck_domain::{Location, Stage, ValidationFailure};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with a spinner-and-bar over the four stages
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(bar) = guard.as_ref()
        {
            f(bar);
        }
    }

    fn stage_label(stage: Stage) -> String {
        format!("Step {}/{}: {}", stage.position(), Stage::ALL.len(), stage.activity())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_pipeline_start(&self, location: &Location) {
        let bar = ProgressBar::with_draw_target(
            Some(Stage::ALL.len() as u64),
            ProgressDrawTarget::stderr(),
        );
        bar.set_style(Self::style());
        bar.set_prefix(location.to_string());
        bar.set_message("Starting...");
        bar.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(bar);
        }
    }

    fn on_stage_start(&self, stage: Stage) {
        self.with_bar(|bar| bar.set_message(Self::stage_label(stage)));
    }

    fn on_stage_complete(&self, stage: Stage, degraded: bool) {
        self.with_bar(|bar| {
            let mark = if degraded { "!".yellow() } else { "v".green() };
            bar.println(format!("{} {}", mark, stage.activity()));
            bar.inc(1);
        });
    }

    fn on_stage_failed(&self, stage: Stage, reason: &str) {
        self.with_bar(|bar| {
            bar.println(format!("{} {}: {}", "x".red(), stage.activity(), reason));
        });
    }

    fn on_pipeline_complete(&self, state: &foodtruck_domain::ResearchState) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            if state.failure().is_some() {
                bar.abandon_with_message("failed".red().to_string());
            } else {
                bar.finish_with_message("complete!".green().to_string());
            }
        }
    }

    fn on_retry(&self, stage: Stage, attempt: u32, delay: Duration, error: &str) {
        self.with_bar(|bar| {
            bar.set_message(format!(
                "{} (retry {} in {:.1}s: {})",
                Self::stage_label(stage),
                attempt,
                delay.as_secs_f64(),
                error
            ));
        });
    }

    fn on_validation_fallback(&self, stage: Stage, failure: &ValidationFailure) {
        self.with_bar(|bar| {
            bar.println(format!(
                "{} {} response invalid, using fallback: {}",
                "!".yellow(),
                stage.activity(),
                failure
            ));
        });
    }
}

/// Simple text-based progress (no fancy UI), written to stderr
///
/// Used when stderr is not a terminal, so redirected output stays readable.
pub struct SimpleProgress;

impl SimpleProgress {
    /// `[##..] Step 3/4: Operations Analysis`
    pub fn stage_line(stage: Stage) -> String {
        let done = stage.position() - 1;
        format!(
            "[{}{}] {}",
            "#".repeat(done),
            ".".repeat(Stage::ALL.len() - done),
            ProgressReporter::stage_label(stage)
        )
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_pipeline_start(&self, location: &Location) {
        eprintln!("{} Starting research for: {}", "->".cyan(), location.to_string().bold());
    }

    fn on_stage_start(&self, stage: Stage) {
        eprintln!("{}", Self::stage_line(stage));
    }

    fn on_stage_complete(&self, stage: Stage, degraded: bool) {
        if degraded {
            eprintln!("  {} {} (fallback data)", "!".yellow(), stage.activity());
        } else {
            eprintln!("  {} {}", "v".green(), stage.activity());
        }
    }

    fn on_stage_failed(&self, stage: Stage, reason: &str) {
        eprintln!("  {} {} failed: {}", "x".red(), stage.activity(), reason);
    }

    fn on_retry(&self, _stage: Stage, attempt: u32, delay: Duration, error: &str) {
        eprintln!(
            "    retry {} in {:.1}s ({})",
            attempt,
            delay.as_secs_f64(),
            error
        );
    }

    fn on_validation_fallback(&self, stage: Stage, failure: &ValidationFailure) {
        eprintln!("    {} response invalid: {}", stage.activity(), failure);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodtruck_domain::ResearchState;

    #[test]
    fn test_stage_label() {
        assert_eq!(
            ProgressReporter::stage_label(Stage::OperationsConsultant),
            "Step 3/4: Operations Analysis"
        );
    }

    #[test]
    fn test_reporter_runs_through_a_pipeline() {
        let reporter = ProgressReporter::new();
        let location = Location::try_new("Austin, TX").unwrap();
        let mut state = ResearchState::new(location.clone());

        reporter.on_pipeline_start(&location);
        for stage in Stage::ALL {
            reporter.on_stage_start(stage);
            let record = stage.fallback(&state);
            state.record(record).unwrap();
            reporter.on_stage_complete(stage, stage == Stage::MarketResearch);
        }
        reporter.on_pipeline_complete(&state);

        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_events_without_a_bar_are_ignored() {
        let reporter = ProgressReporter::new();
        reporter.on_stage_start(Stage::MarketResearch);
        reporter.on_stage_failed(Stage::MarketResearch, "boom");
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_simple_progress_stage_lines() {
        assert_eq!(
            SimpleProgress::stage_line(Stage::MarketResearch),
            format!("[....] {}", ProgressReporter::stage_label(Stage::MarketResearch))
        );
        assert_eq!(
            SimpleProgress::stage_line(Stage::OperationsConsultant),
            "[##..] Step 3/4: Operations Analysis"
        );
    }

    #[test]
    fn test_simple_progress_handles_every_event() {
        colored::control::set_override(false);
        let progress = SimpleProgress;
        let location = Location::try_new("Austin, TX").unwrap();
        let mut state = ResearchState::new(location.clone());

        progress.on_pipeline_start(&location);
        for stage in Stage::ALL {
            progress.on_stage_start(stage);
            progress.on_retry(stage, 1, Duration::from_secs(1), "rate limit");
            progress.on_validation_fallback(stage, &ValidationFailure::NoJsonObject);
            let record = stage.fallback(&state);
            state.record(record).unwrap();
            progress.on_stage_complete(stage, false);
        }
        progress.on_stage_failed(Stage::BusinessSynthesis, "boom");
        progress.on_pipeline_complete(&state);
        assert_eq!(state.completed_stages().len(), Stage::ALL.len());
    }
}
