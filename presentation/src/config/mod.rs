//! Presentation-level configuration
//!
//! Output settings after command-line flags are laid over the loaded
//! configuration.

use crate::cli::commands::Cli;
use foodtruck_domain::OutputFormat;
use std::path::{Path, PathBuf};

/// Resolved output behavior for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Write the report to a file as well as stdout
    pub save: bool,
    pub directory: PathBuf,
    /// Show progress indicators on stderr
    pub show_progress: bool,
}

impl OutputConfig {
    /// Flags win over the configured format and directory. Passing
    /// `--output-dir` implies `--save`.
    pub fn resolve(cli: &Cli, configured_format: OutputFormat, configured_dir: &Path) -> Self {
        Self {
            format: cli.output.map(OutputFormat::from).unwrap_or(configured_format),
            save: cli.save || cli.output_dir.is_some(),
            directory: cli
                .output_dir
                .clone()
                .unwrap_or_else(|| configured_dir.to_path_buf()),
            show_progress: !cli.quiet,
        }
    }
}
