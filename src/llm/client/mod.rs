// src/llm/client/mod.rs
// Chat-completion client: one POST per call, raw envelope back

use async_trait::async_trait;
use reqwest::{header, Client as ReqwestClient};
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::{CompletionError, ConfigError};
use crate::llm::messages::ChatMessage;

pub mod config;

pub use config::ClientConfig;

/// Header carrying the provider key
pub const API_KEY_HEADER: &str = "api-key";

/// Anything that can turn messages into a provider envelope.
///
/// Implementations make a single attempt and return the decoded top-level
/// JSON untouched. Transport problems come back as `CompletionError`.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<Value, CompletionError>;
}

pub struct CompletionClient {
    client: ReqwestClient,
    config: ClientConfig,
}

impl CompletionClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut builder = ReqwestClient::builder().pool_max_idle_per_host(10);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

pub fn request_body(messages: &[ChatMessage], max_tokens: u32) -> Value {
    json!({
        "messages": messages,
        "max_tokens": max_tokens,
    })
}

#[async_trait]
impl ChatCompletion for CompletionClient {
    async fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<Value, CompletionError> {
        debug!(
            "Completion request: host={}, messages={}, max_tokens={}",
            self.config.endpoint_host().unwrap_or_default(),
            messages.len(),
            max_tokens
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CACHE_CONTROL, "no-cache")
            .header(API_KEY_HEADER, self.config.api_key())
            .json(&request_body(messages, max_tokens))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "Completion API error ({} {})",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            );
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        // Read as text first so a non-JSON body is reported as such, not as a network error
        let text = response.text().await?;
        let envelope: Value = serde_json::from_str(&text)?;
        Ok(envelope)
    }
}
