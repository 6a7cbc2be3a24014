// src/config/mod.rs
// Process-wide settings, loaded once from .env and the environment

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Deployment URL used when MEDISCAN_ENDPOINT is unset. Includes the api-version query.
pub const DEFAULT_ENDPOINT: &str = "https://mediscan.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-08-01-preview";

#[derive(Debug, Clone, Deserialize)]
pub struct MediscanConfig {
    // ── Completion endpoint
    pub endpoint: String,
    pub timeout_secs: u64,

    // ── Token budgets per request family
    pub text_max_tokens: u32,
    pub recommendation_max_tokens: u32,
    pub image_max_tokens: u32,

    // ── Logging
    pub log_level: String,
}

// Values may carry trailing comments and whitespace in .env files
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => {
                    debug!("Config: {} = {} (from environment)", key, clean_val);
                    parsed
                }
                Err(_) => {
                    warn!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl MediscanConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            debug!(".env file not found, using environment variables and defaults");
        }

        Self {
            endpoint: env_var_or("MEDISCAN_ENDPOINT", DEFAULT_ENDPOINT.to_string()),
            timeout_secs: env_var_or("MEDISCAN_TIMEOUT_SECS", 60),
            text_max_tokens: env_var_or("MEDISCAN_TEXT_MAX_TOKENS", 800),
            recommendation_max_tokens: env_var_or("MEDISCAN_RECOMMENDATION_MAX_TOKENS", 500),
            image_max_tokens: env_var_or("MEDISCAN_IMAGE_MAX_TOKENS", 1000),
            log_level: env_var_or("MEDISCAN_LOG_LEVEL", "info".to_string()),
        }
    }

    /// Transport timeout; `None` when disabled with 0.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    pub fn tracing_level(&self) -> tracing::Level {
        tracing::Level::from_str(&self.log_level).unwrap_or(tracing::Level::INFO)
    }
}

pub static CONFIG: Lazy<MediscanConfig> = Lazy::new(MediscanConfig::from_env);
