//! Output configuration from TOML (`[output]` section)

use foodtruck_domain::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and how the finished report goes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Report format (uses domain type)
    pub format: OutputFormat,
    /// Directory for saved reports
    pub directory: PathBuf,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Markdown,
            directory: PathBuf::from("."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "json"
directory = "reports"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.directory, PathBuf::from("reports"));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let toml_str = r#"
[output]
format = "pdf"
"#;
        let result: Result<super::super::FileConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }
}
