//! Shared HTTP plumbing for the provider adapters

use foodtruck_application::GatewayError;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use super::ProviderError;

pub(crate) fn build_client(timeout: Option<Duration>) -> Result<Client, ProviderError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| ProviderError::Client(e.to_string()))
}

/// Transport failures keep the words retry classification looks for.
pub(crate) fn map_send_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::ConnectionError(err.to_string())
    } else {
        GatewayError::RequestFailed(err.to_string())
    }
}

/// Non-success status as a gateway error carrying the status code.
///
/// Both APIs put a readable message at `error.message`; anything else is
/// passed through as-is.
pub(crate) fn map_http_error(status: StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    let message = match status.canonical_reason() {
        Some(reason) if message.is_empty() => reason.to_string(),
        Some(reason) => format!("{} ({})", message, reason),
        None => message,
    };
    GatewayError::Http {
        status: status.as_u16(),
        message,
    }
}

pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, GatewayError> {
    let status = response.status();
    let body = response.text().await.map_err(map_send_error)?;
    if !status.is_success() {
        return Err(map_http_error(status, &body));
    }
    serde_json::from_str(&body)
        .map_err(|e| GatewayError::Other(format!("Invalid JSON in response: {}", e)))
}
