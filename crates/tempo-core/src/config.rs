//! Runtime configuration for the bot.
//!
//! Values come from the command line or the environment (see the `tempo`
//! binary) and are validated here into a [`BotConfig`].

use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

use crate::error::{Result, TempoError};

/// Token used when `BOT_TOKEN` is unset. The provider rejects it at startup.
pub const PLACEHOLDER_TOKEN: &str = "YOUR_BOT_TOKEN";

/// Default port for the liveness server.
pub const DEFAULT_PORT: u16 = 10000;

/// Default Telegram Bot API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Default HTTP request timeout for provider calls, in seconds.
///
/// Must exceed the long-poll timeout so `getUpdates` is not cut short.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Validated bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot authentication token
    pub token: String,

    /// Port the liveness server listens on
    pub port: u16,

    /// Reference time zone for every date/time computation
    pub utc_offset: FixedOffset,

    /// Telegram Bot API base URL
    pub api_base_url: String,

    /// Timeout for a single provider request
    pub request_timeout: Duration,

    /// Optional directory for JSON log files
    pub log_dir: Option<PathBuf>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: PLACEHOLDER_TOKEN.to_string(),
            port: DEFAULT_PORT,
            utc_offset: utc(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            log_dir: None,
        }
    }
}

impl BotConfig {
    /// Set the bot token. Empty or missing tokens fall back to the placeholder.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = match token {
            Some(t) if !t.trim().is_empty() => t.trim().to_string(),
            _ => PLACEHOLDER_TOKEN.to_string(),
        };
        self
    }

    /// Set the liveness port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the reference zone from a `+HH:MM` style string.
    pub fn with_utc_offset(mut self, offset: &str) -> Result<Self> {
        self.utc_offset = parse_utc_offset(offset)?;
        Ok(self)
    }

    /// Set a custom API base URL (trailing slashes are dropped).
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the provider request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the JSON log directory.
    pub fn with_log_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.log_dir = dir;
        self
    }

    /// Whether the token is still the placeholder.
    pub fn uses_placeholder_token(&self) -> bool {
        self.token == PLACEHOLDER_TOKEN
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Parse a UTC offset such as `+05:30`, `-03:00`, `+0530`, `UTC` or `Z`.
pub fn parse_utc_offset(value: &str) -> Result<FixedOffset> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("utc") || value == "Z" {
        return Ok(utc());
    }

    let invalid =
        || TempoError::config_invalid("utc_offset", format!("expected +HH:MM, got '{value}'"));

    let (sign, rest) = match value.as_bytes()[0] {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert_eq!(config.port, 10000);
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
        assert!(config.uses_placeholder_token());
        assert_eq!(config.api_base_url, "https://api.telegram.org");
    }

    #[test]
    fn test_token_fallback() {
        let config = BotConfig::default().with_token(Some("   ".to_string()));
        assert!(config.uses_placeholder_token());

        let config = BotConfig::default().with_token(None);
        assert_eq!(config.token, PLACEHOLDER_TOKEN);

        let config = BotConfig::default().with_token(Some("123:abc".to_string()));
        assert_eq!(config.token, "123:abc");
        assert!(!config.uses_placeholder_token());
    }

    #[test]
    fn test_parse_utc_offset_variants() {
        assert_eq!(parse_utc_offset("+05:30").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_utc_offset("+0530").unwrap().local_minus_utc(), 19800);
        assert_eq!(parse_utc_offset("-03:00").unwrap().local_minus_utc(), -10800);
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset("").unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_utc_offset_rejects_garbage() {
        for bad in ["05:30", "+5:30", "+05:75", "+ab:cd", "+99:00", "IST"] {
            let err = parse_utc_offset(bad).unwrap_err();
            assert!(err.is_config_error(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_api_base_url_trims_slash() {
        let config = BotConfig::default().with_api_base_url("http://localhost:8081/");
        assert_eq!(config.api_base_url, "http://localhost:8081");
    }
}
