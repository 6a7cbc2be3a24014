// src/llm/client/config.rs
// Completion client configuration with explicit API key injection

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::config::CONFIG;
use crate::error::ConfigError;

pub const API_KEY_VAR: &str = "MEDISCAN_API_KEY";

#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    endpoint: String,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Key from MEDISCAN_API_KEY, endpoint and timeout from the global CONFIG.
    /// There is no fallback key: a missing one fails here, not on the first request.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).ok_or(ConfigError::MissingVar(API_KEY_VAR))?;

        let config = Self::new(api_key, CONFIG.endpoint.clone(), CONFIG.timeout());
        config.validate()?;

        debug!(
            "Completion client configured: host={}, timeout={:?}",
            config.endpoint_host().unwrap_or_default(),
            config.timeout
        );
        Ok(config)
    }

    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Full deployment URL, api-version query included
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn endpoint_host(&self) -> Option<String> {
        Url::parse(&self.endpoint)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        let url = Url::parse(&self.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            url: self.endpoint.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                url: self.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(())
    }
}

// Keep the key out of logs
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}
