//! OpenAI Chat Completions API adapter
//!
//! Works against any endpoint that speaks the same API (set `base_url`).

use super::http::{build_client, map_send_error, read_json};
use super::{ProviderAdapter, ProviderError, ProviderKind};
use crate::config::FileOpenAiConfig;
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
    max_tokens: u32,
    temperature: f64,
}

pub struct OpenAiAdapter {
    settings: Arc<Settings>,
}

impl OpenAiAdapter {
    pub fn new(
        config: &FileOpenAiConfig,
        api_key: String,
        temperature: f64,
        timeout: Option<Duration>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            settings: Arc::new(Settings {
                client: build_client(timeout)?,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                api_key,
                max_tokens: config.max_tokens,
                temperature,
            }),
        })
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(OpenAiSession {
            settings: Arc::clone(&self.settings),
            model: model.clone(),
            system_prompt: system_prompt.to_string(),
        }))
    }
}

struct OpenAiSession {
    settings: Arc<Settings>,
    model: Model,
    system_prompt: String,
}

impl OpenAiSession {
    fn request_body(&self, content: &str) -> Value {
        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.is_empty() {
            messages.push(json!({ "role": "system", "content": self.system_prompt }));
        }
        messages.push(json!({ "role": "user", "content": content }));

        json!({
            "model": self.model.as_str(),
            "messages": messages,
            "temperature": self.settings.temperature,
            "max_tokens": self.settings.max_tokens,
            "stream": false,
        })
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let url = format!("{}/v1/chat/completions", self.settings.base_url);
        debug!(url = %url, model = %self.model, bytes = content.len(), "Sending OpenAI request");

        let response = self
            .settings
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(content))
            .send()
            .await
            .map_err(map_send_error)?;

        parse_response(&read_json(response).await?)
    }
}

fn parse_response(body: &Value) -> Result<String, GatewayError> {
    let choice = body["choices"]
        .get(0)
        .ok_or_else(|| GatewayError::Other("Missing 'choices' in response".to_string()))?;

    debug!(
        finish_reason = choice["finish_reason"].as_str().unwrap_or("unknown"),
        completion_tokens = body["usage"]["completion_tokens"].as_u64().unwrap_or(0),
        "OpenAI response received"
    );

    Ok(choice["message"]["content"]
        .as_str()
        .unwrap_or_default()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(system_prompt: &str) -> OpenAiSession {
        let config = FileOpenAiConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        };
        let adapter = OpenAiAdapter::new(&config, "sk-test".to_string(), 0.1, None).unwrap();
        OpenAiSession {
            settings: adapter.settings,
            model: Model::Gpt4,
            system_prompt: system_prompt.to_string(),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(session("").settings.base_url, "http://localhost:8080");
    }

    #[test]
    fn test_request_body_sends_system_then_user() {
        let body = session("You are a Market Research Analyst").request_body("Analyze Denver, CO");
        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Analyze Denver, CO");
        assert_eq!(body["temperature"], 0.1);
    }

    #[test]
    fn test_request_body_without_system() {
        let body = session("").request_body("hi");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_response_reads_first_choice() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "{}"}, "finish_reason": "stop"}]
        });
        assert_eq!(parse_response(&body).unwrap(), "{}");
    }

    #[test]
    fn test_parse_response_without_choices_fails() {
        assert!(parse_response(&json!({"choices": []})).is_err());
        assert!(parse_response(&json!({})).is_err());
    }
}
