//! Model configuration from TOML (`[model]` section)

use foodtruck_domain::Model;
use serde::{Deserialize, Serialize};

/// Which model to call and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Model identifier, e.g. "gpt-4" or "claude-sonnet-4-5"
    pub name: String,
    /// Sampling temperature, 0.0 to 2.0
    pub temperature: f64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            name: Model::default().to_string(),
            temperature: 0.1,
        }
    }
}

impl FileModelConfig {
    /// Parse the configured name. `None` when the name is blank.
    pub fn parse_model(&self) -> Option<Model> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        name.parse().ok()
    }
}
