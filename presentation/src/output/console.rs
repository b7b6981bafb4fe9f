//! Console decorations around the report
//!
//! Everything here goes to stderr; stdout carries only the report itself.

use colored::Colorize;
use foodtruck_domain::{Location, Model, ResearchState, Stage};

/// Formats run banners and summaries for terminal display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner printed before the run starts
    pub fn header(location: &Location, model: &Model, temperature: f64) -> String {
        let line = "=".repeat(60);
        format!(
            "{}\n{:^60}\n{}\n{} {}\n{} {} (temperature: {})\n",
            line.cyan(),
            "Food Truck Research".bold(),
            line.cyan(),
            "Location:".cyan().bold(),
            location,
            "Model:".cyan().bold(),
            model,
            temperature
        )
    }

    /// One-line outcome plus a note for every stage that fell back
    pub fn summary(state: &ResearchState, degraded: &[Stage]) -> String {
        let mut output = String::new();

        match state.failure() {
            Some(failure) => output.push_str(&format!(
                "{} {} failed: {}\n",
                "x".red().bold(),
                failure.stage.activity(),
                failure.reason
            )),
            None => output.push_str(&format!(
                "{} Research complete for {} ({} of {} stages)\n",
                "v".green().bold(),
                state.location(),
                state.completed_stages().len(),
                Stage::ALL.len()
            )),
        }

        for stage in degraded {
            output.push_str(&format!(
                "  {} {} used fallback data (response could not be validated)\n",
                "!".yellow().bold(),
                stage.activity()
            ));
        }

        output
    }

    /// Where the report was saved
    pub fn saved(path: &std::path::Path) -> String {
        format!("{} Results saved to: {}", "v".green(), path.display())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
