//! Text-generation provider adapters
//!
//! Each adapter speaks one HTTP API. [`RoutingGateway`] picks the adapter for
//! a model and is what the application layer sees as its
//! [`LlmGateway`](foodtruck_application::LlmGateway).

pub mod anthropic;
mod http;
pub mod openai;
pub mod routing;

pub use anthropic::AnthropicAdapter;
pub use openai::OpenAiAdapter;
pub use routing::RoutingGateway;

use crate::config::FileConfig;
use async_trait::async_trait;
use foodtruck_application::{GatewayError, LlmSession};
use foodtruck_domain::Model;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Provider a model is sent to: the model family decides, then
    /// `default`, then OpenAI.
    pub fn for_model(model: &Model, default: Option<ProviderKind>) -> ProviderKind {
        if model.is_claude() {
            ProviderKind::Anthropic
        } else if model.is_gpt() {
            ProviderKind::OpenAi
        } else {
            default.unwrap_or(ProviderKind::OpenAi)
        }
    }

    pub fn other(&self) -> ProviderKind {
        match self {
            ProviderKind::Anthropic => ProviderKind::OpenAi,
            ProviderKind::OpenAi => ProviderKind::Anthropic,
        }
    }

    /// Model used when a run has to move to this provider
    pub fn default_model(&self) -> Model {
        match self {
            ProviderKind::Anthropic => Model::Claude3Sonnet,
            ProviderKind::OpenAi => Model::Gpt4,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" | "open_ai" | "open-ai" => Ok(ProviderKind::OpenAi),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// Problems building the gateway from configuration
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(
        "no API key for provider '{provider}': set {env_var} or providers.{provider}.api_key"
    )]
    MissingApiKey {
        provider: ProviderKind,
        env_var: String,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// The model a run will use, after checking its provider has a key
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSelection {
    pub model: Model,
    /// Set when the configured model was swapped for another provider's
    pub switched_from: Option<Model>,
}

/// Pick the model to run with.
///
/// When the provider the requested model routes to has no key, a model that
/// came from configuration is swapped for the other provider's default
/// (`gpt-4` for OpenAI, `claude-3-sonnet-20240229` for Anthropic) as long as
/// that provider has a key. A `pinned` model (named on the command line) is
/// never swapped.
pub fn select_model(
    config: &FileConfig,
    requested: Model,
    pinned: bool,
) -> Result<ModelSelection, ProviderError> {
    let kind = ProviderKind::for_model(&requested, config.default_provider());
    if has_key(config, kind) {
        return Ok(ModelSelection {
            model: requested,
            switched_from: None,
        });
    }

    let other = kind.other();
    if pinned || !has_key(config, other) {
        return Err(missing_key(config, kind));
    }

    let model = other.default_model();
    debug!("{} has no key for {}, switching to {}", kind, requested, model);
    Ok(ModelSelection {
        model,
        switched_from: Some(requested),
    })
}

fn has_key(config: &FileConfig, kind: ProviderKind) -> bool {
    match kind {
        ProviderKind::Anthropic => config.providers.anthropic.resolve_api_key().is_some(),
        ProviderKind::OpenAi => config.providers.openai.resolve_api_key().is_some(),
    }
}

fn missing_key(config: &FileConfig, kind: ProviderKind) -> ProviderError {
    let env_var = match kind {
        ProviderKind::Anthropic => &config.providers.anthropic.api_key_env,
        ProviderKind::OpenAi => &config.providers.openai.api_key_env,
    };
    ProviderError::MissingApiKey {
        provider: kind,
        env_var: env_var.clone(),
    }
}

/// Build a routing gateway with every provider that has a key.
///
/// Fails when the provider `model` routes to has no key, since every
/// stage call would then fail authentication.
pub fn build_gateway(config: &FileConfig, model: &Model) -> Result<RoutingGateway, ProviderError> {
    let default = config.default_provider();
    let selected = ProviderKind::for_model(model, default);
    let timeout = config.http.timeout();
    let temperature = config.model.temperature;

    let mut providers: Vec<Arc<dyn ProviderAdapter>> = Vec::new();

    if let Some(key) = config.providers.anthropic.resolve_api_key() {
        providers.push(Arc::new(AnthropicAdapter::new(
            &config.providers.anthropic,
            key,
            temperature,
            timeout,
        )?));
    } else if selected == ProviderKind::Anthropic {
        return Err(missing_key(config, selected));
    }

    if let Some(key) = config.providers.openai.resolve_api_key() {
        providers.push(Arc::new(OpenAiAdapter::new(
            &config.providers.openai,
            key,
            temperature,
            timeout,
        )?));
    } else if selected == ProviderKind::OpenAi {
        return Err(missing_key(config, selected));
    }

    Ok(RoutingGateway::new(providers, default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_model_uses_family_first() {
        assert_eq!(
            ProviderKind::for_model(&Model::ClaudeSonnet45, Some(ProviderKind::OpenAi)),
            ProviderKind::Anthropic
        );
        assert_eq!(
            ProviderKind::for_model(&Model::Gpt4, Some(ProviderKind::Anthropic)),
            ProviderKind::OpenAi
        );
    }

    #[test]
    fn test_for_model_unknown_family_uses_default() {
        let model = Model::Custom("llama-3-70b".to_string());
        assert_eq!(
            ProviderKind::for_model(&model, Some(ProviderKind::Anthropic)),
            ProviderKind::Anthropic
        );
        assert_eq!(ProviderKind::for_model(&model, None), ProviderKind::OpenAi);
    }

    #[test]
    fn test_parse_provider_kind() {
        assert_eq!("Anthropic".parse::<ProviderKind>(), Ok(ProviderKind::Anthropic));
        assert_eq!("openai".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert!("mistral".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_build_gateway_requires_key_for_selected_provider() {
        let mut config = FileConfig::default();
        config.providers.anthropic.api_key_env = "FOODTRUCK_TEST_UNSET_ANTHROPIC".to_string();
        config.providers.openai.api_key_env = "FOODTRUCK_TEST_UNSET_OPENAI".to_string();
        config.providers.openai.api_key = Some("sk-test".to_string());

        match build_gateway(&config, &Model::ClaudeSonnet45) {
            Err(ProviderError::MissingApiKey { provider, env_var }) => {
                assert_eq!(provider, ProviderKind::Anthropic);
                assert_eq!(env_var, "FOODTRUCK_TEST_UNSET_ANTHROPIC");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected a missing key error"),
        }

        assert!(build_gateway(&config, &Model::Gpt4).is_ok());
    }

    fn keys(anthropic: Option<&str>, openai: Option<&str>) -> FileConfig {
        let mut config = FileConfig::default();
        config.providers.anthropic.api_key_env = "FOODTRUCK_TEST_UNSET_ANTHROPIC".to_string();
        config.providers.openai.api_key_env = "FOODTRUCK_TEST_UNSET_OPENAI".to_string();
        config.providers.anthropic.api_key = anthropic.map(str::to_string);
        config.providers.openai.api_key = openai.map(str::to_string);
        config
    }

    #[test]
    fn test_select_model_keeps_model_with_key() {
        let config = keys(Some("sk-ant"), None);
        let selection = select_model(&config, Model::ClaudeSonnet45, false).unwrap();
        assert_eq!(selection.model, Model::ClaudeSonnet45);
        assert_eq!(selection.switched_from, None);
    }

    #[test]
    fn test_select_model_switches_configured_model() {
        let config = keys(None, Some("sk-openai"));
        let selection = select_model(&config, Model::ClaudeSonnet45, false).unwrap();
        assert_eq!(selection.model, Model::Gpt4);
        assert_eq!(selection.switched_from, Some(Model::ClaudeSonnet45));

        let config = keys(Some("sk-ant"), None);
        let selection = select_model(&config, Model::Gpt4o, false).unwrap();
        assert_eq!(selection.model, Model::Claude3Sonnet);
        assert_eq!(selection.switched_from, Some(Model::Gpt4o));
        assert!(build_gateway(&config, &selection.model).is_ok());
    }

    #[test]
    fn test_select_model_never_switches_pinned_model() {
        let config = keys(None, Some("sk-openai"));
        match select_model(&config, Model::ClaudeSonnet45, true) {
            Err(ProviderError::MissingApiKey { provider, .. }) => {
                assert_eq!(provider, ProviderKind::Anthropic);
            }
            other => panic!("expected a missing key error, got {other:?}"),
        }
    }

    #[test]
    fn test_select_model_without_any_key_fails() {
        let config = keys(None, None);
        match select_model(&config, Model::Gpt4, false) {
            Err(ProviderError::MissingApiKey { provider, env_var }) => {
                assert_eq!(provider, ProviderKind::OpenAi);
                assert_eq!(env_var, "FOODTRUCK_TEST_UNSET_OPENAI");
            }
            other => panic!("expected a missing key error, got {other:?}"),
        }
    }
}
