//! Report file writer
//!
//! Reports are named after the location: `food_truck_research_<slug>.<ext>`,
//! where the slug is the location lower-cased with commas dropped and any
//! other character that is not alphanumeric, `-` or `_` turned into `_`.
//! Reports therefore always land directly inside the output directory.

use foodtruck_domain::{Location, OutputFormat};
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes rendered reports into one output directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    directory: PathBuf,
}

impl ReportWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path the report for `location` would be written to
    pub fn path_for(&self, location: &Location, format: OutputFormat) -> PathBuf {
        self.directory.join(format!(
            "food_truck_research_{}.{}",
            location.slug(),
            format.extension()
        ))
    }

    /// Write `content`, creating the directory if needed. Overwrites an
    /// existing report for the same location.
    pub fn write(
        &self,
        location: &Location,
        format: OutputFormat,
        content: &str,
    ) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.path_for(location, format);
        std::fs::write(&path, content)?;
        info!("Report saved to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn austin() -> Location {
        Location::try_new("Austin, TX").unwrap()
    }

    #[test]
    fn test_file_name_from_location() {
        let writer = ReportWriter::new("reports");
        assert_eq!(
            writer.path_for(&austin(), OutputFormat::Markdown),
            PathBuf::from("reports/food_truck_research_austin_tx.md")
        );
        let location = Location::try_new("San Francisco, CA").unwrap();
        assert_eq!(
            writer.path_for(&location, OutputFormat::Json),
            PathBuf::from("reports/food_truck_research_san_francisco_ca.json")
        );
    }

    #[test]
    fn test_write_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(dir.path().join("out"));

        let path = writer
            .write(&austin(), OutputFormat::Markdown, "first")
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first");

        let again = writer
            .write(&austin(), OutputFormat::Markdown, "second")
            .unwrap();
        assert_eq!(path, again);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_path_characters_stay_inside_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let writer = ReportWriter::new(&out);

        let location = Location::try_new("Winston-Salem/NC").unwrap();
        let path = writer
            .write(&location, OutputFormat::Markdown, "report")
            .unwrap();
        assert_eq!(path, out.join("food_truck_research_winston-salem_nc.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "report");

        let location = Location::try_new("../../escape").unwrap();
        let path = writer.path_for(&location, OutputFormat::Markdown);
        assert_eq!(path.parent(), Some(out.as_path()));
        assert_eq!(path, out.join("food_truck_research_escape.md"));
    }
}
