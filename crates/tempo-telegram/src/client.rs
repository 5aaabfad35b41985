//! Telegram Bot API client over HTTP.
//!
//! Every call is a JSON `POST` to `{base}/bot{token}/{method}`. The response
//! envelope is parsed whatever the HTTP status, because the Bot API reports
//! its errors (including flood control) inside the envelope.
//!
//! ## Example
//!
//! ```no_run
//! use tempo_telegram::{ChatId, MessageTransport, TelegramClient, TelegramConfig};
//!
//! # async fn example() -> tempo_telegram::Result<()> {
//! let config = TelegramConfig::default().with_token("123:abc");
//! let client = TelegramClient::from_config(config)?;
//! let id = client.send(ChatId(42), "hello").await?;
//! client.edit(ChatId(42), id, "hello again").await?;
//! # Ok(())
//! # }
//! ```

use ::async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::TelegramConfig;
use crate::error::{Result, TransportError};
use crate::transport::{MessageTransport, UpdateSource};
use crate::types::{
    ApiEnvelope, ChatId, DeleteWebhookParams, EditMessageTextParams, GetUpdatesParams, Message,
    MessageId, SendMessageParams, Update, User,
};

/// Only plain messages are requested from `getUpdates`.
const ALLOWED_UPDATES: &[&str] = &["message"];

/// Telegram Bot API client.
pub struct TelegramClient {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramClient {
    /// Create a client from config.
    pub fn from_config(config: TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Http(e.without_url()))?;

        Ok(Self { config, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base_url, self.config.token, method
        )
    }

    /// Invoke a Bot API method and unwrap its envelope.
    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R>
    where
        P: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        debug!(method, "Bot API request");

        // Errors carry the URL, which contains the token.
        let response = self
            .client
            .post(self.method_url(method))
            .json(params)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Http(e.without_url()))?;

        let envelope: ApiEnvelope<R> = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(TransportError::Json(e)),
            Err(_) => {
                return Err(TransportError::from_api(
                    i64::from(status.as_u16()),
                    body.trim(),
                    None,
                ));
            }
        };

        if envelope.ok {
            return envelope.result.ok_or_else(|| {
                TransportError::MalformedResponse(format!("{method}: ok without result"))
            });
        }

        let code = envelope
            .error_code
            .unwrap_or_else(|| i64::from(status.as_u16()));
        let description = envelope.description.unwrap_or_default();
        let retry_after = envelope.parameters.and_then(|p| p.retry_after);
        debug!(method, code, %description, "Bot API error");
        Err(TransportError::from_api(code, &description, retry_after))
    }

    /// Fetch the bot's own account. Used at startup to validate the token.
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Remove any webhook, optionally dropping queued updates.
    pub async fn delete_webhook(&self, drop_pending_updates: bool) -> Result<()> {
        let _: bool = self
            .call(
                "deleteWebhook",
                &DeleteWebhookParams {
                    drop_pending_updates,
                },
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl MessageTransport for TelegramClient {
    async fn send(&self, chat: ChatId, text: &str) -> Result<MessageId> {
        let message: Message = self
            .call("sendMessage", &SendMessageParams { chat_id: chat, text })
            .await?;
        Ok(message.message_id)
    }

    async fn edit(&self, chat: ChatId, message: MessageId, text: &str) -> Result<()> {
        // Result is the edited Message, or `true` for inline messages.
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &EditMessageTextParams {
                    chat_id: chat,
                    message_id: message,
                    text,
                },
            )
            .await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

#[async_trait]
impl UpdateSource for TelegramClient {
    async fn updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &GetUpdatesParams {
                offset,
                timeout: self.config.poll_timeout_secs,
                allowed_updates: ALLOWED_UPDATES,
            },
        )
        .await
    }

    async fn drop_pending(&self) -> Result<()> {
        self.delete_webhook(true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url() {
        let config = TelegramConfig::default()
            .with_token("123:abc")
            .with_api_base_url("http://localhost:8081/");
        let client = TelegramClient::from_config(config).unwrap();
        assert_eq!(
            client.method_url("sendMessage"),
            "http://localhost:8081/bot123:abc/sendMessage"
        );
        assert_eq!(client.name(), "telegram");
    }
}
