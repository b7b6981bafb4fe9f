//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "foodtruck-research";
const PROJECT_FILE: &str = "foodtruck.toml";
const ENV_PREFIX: &str = "FOODTRUCK_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `FOODTRUCK_*` (`__` nests), `MODEL_NAME`, `TEMPERATURE`
    /// 2. Explicit config path (if provided; must exist)
    /// 3. Project root: `./foodtruck.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/foodtruck-research/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::from(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(Box::new(figment::Error::from(format!(
                    "config file not found: {}",
                    path.display()
                ))));
            }
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment).extract().map_err(Box::new)
    }

    /// Defaults plus environment, skipping every file (for --no-config)
    pub fn load_without_files() -> Result<FileConfig, Box<figment::Error>> {
        Self::with_env(Figment::from(Serialized::defaults(FileConfig::default())))
            .extract()
            .map_err(Box::new)
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().filter_map(|key| {
                let key = key.as_str();
                if key.eq_ignore_ascii_case("MODEL_NAME") {
                    Some("model.name".into())
                } else if key.eq_ignore_ascii_case("TEMPERATURE") {
                    Some("model.temperature".into())
                } else {
                    None
                }
            }))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/foodtruck-research/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_FILE);
        path.exists().then_some(path)
    }

    /// Describe the config sources being used, highest priority first
    pub fn describe_sources(config_path: Option<&Path>, no_config: bool) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!(
            "  [ENV  ] {}* (e.g. {}MODEL__NAME), MODEL_NAME, TEMPERATURE",
            ENV_PREFIX, ENV_PREFIX
        ));

        if no_config {
            lines.push("  [SKIP ] config files (--no-config)".to_string());
        } else {
            if let Some(path) = config_path {
                let mark = if path.exists() { "FOUND" } else { "MISS " };
                lines.push(format!("  [{}] Explicit: {}", mark, path.display()));
            }

            match Self::project_config_path() {
                Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
                None => lines.push(format!("  [     ] Project: ./{}", PROJECT_FILE)),
            }

            if let Some(path) = Self::global_config_path() {
                let mark = if path.exists() { "FOUND" } else { "     " };
                lines.push(format!("  [{}] Global:  {}", mark, path.display()));
            }
        }

        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}
