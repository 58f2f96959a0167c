//! Process configuration
//!
//! Read from the environment (after an optional `.env` is loaded by `main`).

use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_LLAMA_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_CHAT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Relay configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub telegram_debug: bool,
    pub database_url: String,
    pub database_name: String,
    pub llama_base_url: String,
    pub llama_timeout: Duration,
    pub chat_history_limit: usize,
    /// Health endpoint address; disabled when unset
    pub health_addr: Option<SocketAddr>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as missing
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let llama_timeout_seconds = get("LLAMA_TIMEOUT_SECONDS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_LLAMA_TIMEOUT_SECONDS);
        let chat_history_limit = get("CHAT_HISTORY_LIMIT")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_CHAT_HISTORY_LIMIT);

        let health_addr = get("HEALTH_ADDR")
            .map(|value| {
                value.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: "HEALTH_ADDR",
                    value,
                })
            })
            .transpose()?;

        Ok(Self {
            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            telegram_debug: get("TELEGRAM_DEBUG")
                .map(|v| v.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            database_url: required("DATABASE_URL")?,
            database_name: required("DATABASE_NAME")?,
            llama_base_url: required("LLAMA_BASE_URL")?,
            llama_timeout: Duration::from_secs(llama_timeout_seconds),
            chat_history_limit,
            health_addr,
        })
    }
}
