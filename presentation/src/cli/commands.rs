//! CLI command definitions

use clap::{Parser, ValueEnum};
use foodtruck_domain::OutputFormat;
use std::path::PathBuf;

/// Report format chosen on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Markdown report
    Markdown,
    /// The full research state as JSON
    Json,
}

impl From<ReportFormat> for OutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Markdown => OutputFormat::Markdown,
            ReportFormat::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for foodtruck-research
#[derive(Parser, Debug)]
#[command(name = "foodtruck-research")]
#[command(author, version, about = "Research a food truck business opportunity for a location")]
#[command(long_about = r#"
Researches whether a food truck business makes sense in a given location.

Four analysis stages run in order, each building on the previous ones:
1. Market Research: competition, customers and demand
2. Financial Analysis: startup costs, revenue and funding
3. Operations Analysis: permits, staffing and logistics
4. Business Recommendation: go / no-go / conditional

Configuration is loaded from (highest priority first):
1. Command-line flags
2. Environment: FOODTRUCK_* (e.g. FOODTRUCK_RETRY__MAX_ATTEMPTS), MODEL_NAME, TEMPERATURE
3. --config <path>      Explicit config file
4. ./foodtruck.toml     Project-level config
5. ~/.config/foodtruck-research/config.toml   Global config

API keys are read from OPENAI_API_KEY / ANTHROPIC_API_KEY (configurable).

Example:
  foodtruck-research "Austin, TX"
  foodtruck-research "Portland, OR" claude-sonnet-4-5
  foodtruck-research "Denver, CO" --output json --save --output-dir reports
"#)]
pub struct Cli {
    /// City and state to research, e.g. "Austin, TX" (not required with --show-config)
    #[arg(required_unless_present = "show_config")]
    pub location: Option<String>,

    /// Model to use (same as --model)
    #[arg(value_name = "MODEL", conflicts_with = "model")]
    pub model_positional: Option<String>,

    /// Model to use, e.g. gpt-4 or claude-sonnet-4-5
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub output: Option<ReportFormat>,

    /// Save the report to food_truck_research_<location>.<ext>
    #[arg(short, long)]
    pub save: bool,

    /// Directory for saved reports
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write a JSONL transcript of the run to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files (environment still applies)
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Model override from either the positional argument or `--model`
    pub fn model_override(&self) -> Option<&str> {
        self.model
            .as_deref()
            .or(self.model_positional.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}
