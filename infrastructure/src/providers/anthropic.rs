//! Anthropic Messages API adapter
//!
//! Differences from the OpenAI API:
//! - Auth via `x-api-key` header (not `Authorization: Bearer`)
//! - Required `anthropic-version` header
//! - System prompt is a top-level `system` field, not a message

use super::http::{build_client, map_send_error, read_json};
use super::{ProviderAdapter, ProviderError, ProviderKind};
use crate::config::FileAnthropicConfig;
use async_trait::async_trait;
use foodtruck_application::{GatewayError, LlmSession};
use foodtruck_domain::Model;
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

struct Settings {
    client: Client,
    base_url: String,
    api_key: String,
    api_version: String,
    max_tokens: u32,
    temperature: f64,
}

pub struct AnthropicAdapter {
    settings: Arc<Settings>,
}

impl AnthropicAdapter {
    /// The API accepts temperatures up to 1.0 only; higher values are clamped.
    pub fn new(
        config: &FileAnthropicConfig,
        api_key: String,
        temperature: f64,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            settings: Arc::new(Settings {
                client: build_client(timeout)?,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key,
                api_version: config.api_version.clone(),
                max_tokens: config.max_tokens,
                temperature: temperature.clamp(0.0, 1.0),
            }),
        })
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(AnthropicSession {
            settings: Arc::clone(&self.settings),
            model: model.clone(),
            system_prompt: system_prompt.to_string(),
        }))
    }
}

struct AnthropicSession {
    settings: Arc<Settings>,
    model: Model,
    system_prompt: String,
}

impl AnthropicSession {
    fn request_body(&self, content: &str) -> Value {
        let mut body = json!({
            "model": self.model.as_str(),
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
            "messages": [{ "role": "user", "content": content }],
        });
        if !self.system_prompt.is_empty() {
            body["system"] = Value::String(self.system_prompt.clone());
        }
        body
    }
}

#[async_trait]
impl LlmSession for AnthropicSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let url = format!("{}/v1/messages", self.settings.base_url);
        debug!(url = %url, model = %self.model, bytes = content.len(), "Sending Anthropic request");

        let response = self
            .settings
            .client
            .post(&url)
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", &self.settings.api_version)
            .header("content-type", "application/json")
            .json(&self.request_body(content))
            .send()
            .await
            .map_err(map_send_error)?;

        parse_response(&read_json(response).await?)
    }
}

/// Concatenate the text blocks of a Messages API response
fn parse_response(body: &Value) -> Result<String, GatewayError> {
    let blocks = body["content"]
        .as_array()
        .ok_or_else(|| GatewayError::Other("Missing 'content' array in response".to_string()))?;

    let text: String = blocks
        .iter()
        .filter(|block| block["type"] == "text")
        .filter_map(|block| block["text"].as_str())
        .collect::<Vec<_>>()
        .join("");

    debug!(
        stop_reason = body["stop_reason"].as_str().unwrap_or("unknown"),
        output_tokens = body["usage"]["output_tokens"].as_u64().unwrap_or(0),
        "Anthropic response received"
    );
    Ok(text)
}
