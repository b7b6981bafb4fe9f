//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key. Prefer the env var.
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Max tokens per response.
    pub max_tokens: u32,
    /// Anthropic API version header.
    pub api_version: String,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 4096,
            api_version: "2023-06-01".to_string(),
        }
    }
}

impl FileAnthropicConfig {
    /// The configured key, or the value of `api_key_env` in the process environment
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env, |name| {
            std::env::var(name).ok()
        })
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key. Prefer the env var.
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API (can point at any compatible endpoint).
    pub base_url: String,
    /// Max tokens per response.
    pub max_tokens: u32,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 4096,
        }
    }
}

impl FileOpenAiConfig {
    /// The configured key, or the value of `api_key_env` in the process environment
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_deref(), &self.api_key_env, |name| {
            std::env::var(name).ok()
        })
    }
}

/// `[providers]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Provider used when the model family doesn't pick one ("anthropic" or "openai")
    pub default: Option<String>,
    pub anthropic: FileAnthropicConfig,
    pub openai: FileOpenAiConfig,
}

/// Blank keys count as missing in both places.
pub(crate) fn resolve_key(
    explicit: Option<&str>,
    env_name: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    if let Some(key) = explicit
        && !key.trim().is_empty()
    {
        return Some(key.to_string());
    }
    if env_name.trim().is_empty() {
        return None;
    }
    lookup(env_name).filter(|key| !key.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_key_wins() {
        let key = resolve_key(Some("sk-file"), "OPENAI_API_KEY", |_| {
            Some("sk-env".to_string())
        });
        assert_eq!(key.as_deref(), Some("sk-file"));
    }

    #[test]
    fn test_env_key_used_when_no_explicit_key() {
        let key = resolve_key(None, "MY_KEY", |name| {
            (name == "MY_KEY").then(|| "sk-env".to_string())
        });
        assert_eq!(key.as_deref(), Some("sk-env"));
    }

    #[test]
    fn test_blank_keys_are_missing() {
        assert_eq!(resolve_key(Some("  "), "MY_KEY", |_| None), None);
        assert_eq!(
            resolve_key(None, "MY_KEY", |_| Some(String::new())),
            None
        );
        assert_eq!(resolve_key(None, "", |_| Some("sk".to_string())), None);
    }

    #[test]
    fn test_deserialize_providers_section() {
        let toml_str = r#"
[providers]
default = "anthropic"

[providers.anthropic]
api_key_env = "CLAUDE_KEY"
max_tokens = 2048

[providers.openai]
base_url = "http://localhost:8080"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.default.as_deref(), Some("anthropic"));
        assert_eq!(config.providers.anthropic.api_key_env, "CLAUDE_KEY");
        assert_eq!(config.providers.anthropic.max_tokens, 2048);
        assert_eq!(config.providers.anthropic.api_version, "2023-06-01");
        assert_eq!(config.providers.openai.base_url, "http://localhost:8080");
        assert_eq!(config.providers.openai.api_key_env, "OPENAI_API_KEY");
    }
}
