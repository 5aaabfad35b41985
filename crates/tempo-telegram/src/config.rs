//! Configuration for the Telegram transport.

use std::time::Duration;

use tempo_core::BotConfig;
use tempo_core::config::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, PLACEHOLDER_TOKEN};

/// Default long-poll wait for `getUpdates`, in seconds.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Telegram client configuration.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token (never logged)
    pub token: String,

    /// Bot API base URL, without trailing slash
    pub api_base_url: String,

    /// Timeout for one HTTP request
    pub request_timeout: Duration,

    /// How long the provider may hold a `getUpdates` request open
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: PLACEHOLDER_TOKEN.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
        }
    }
}

impl From<&BotConfig> for TelegramConfig {
    fn from(config: &BotConfig) -> Self {
        Self {
            token: config.token.clone(),
            api_base_url: config.api_base_url.clone(),
            request_timeout: config.request_timeout,
            ..Default::default()
        }
    }
}

impl TelegramConfig {
    /// Set the token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Set a custom API base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the long-poll timeout.
    pub fn with_poll_timeout(mut self, secs: u64) -> Self {
        self.poll_timeout_secs = secs;
        self
    }
}
