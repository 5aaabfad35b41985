//! Bot API wire types.
//!
//! Only the fields Tempo reads are modelled; unknown fields are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a chat (conversation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a message within a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Envelope wrapping every Bot API response.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub ok: bool,
    pub result: Option<T>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

/// Extra error information, e.g. flood-control wait.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseParameters {
    #[serde(default)]
    pub retry_after: Option<u64>,
}

/// A user or bot account.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl User {
    /// Name to greet the user with.
    pub fn display_name(&self) -> &str {
        &self.first_name
    }
}

/// A chat.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

/// A message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: MessageId,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

/// One entry of a `getUpdates` result.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// `sendMessage` parameters. No `parse_mode`: text is always sent plain.
#[derive(Debug, Serialize)]
pub(crate) struct SendMessageParams<'a> {
    pub chat_id: ChatId,
    pub text: &'a str,
}

/// `editMessageText` parameters. No `parse_mode`: text is always sent plain.
#[derive(Debug, Serialize)]
pub(crate) struct EditMessageTextParams<'a> {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: &'a str,
}

/// `getUpdates` parameters.
#[derive(Debug, Serialize)]
pub(crate) struct GetUpdatesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

/// `deleteWebhook` parameters.
#[derive(Debug, Serialize)]
pub(crate) struct DeleteWebhookParams {
    pub drop_pending_updates: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update_with_command() {
        let json = r#"{
            "update_id": 1001,
            "message": {
                "message_id": 7,
                "date": 1700000000,
                "chat": {"id": -100123, "type": "supergroup"},
                "from": {"id": 9, "is_bot": false, "first_name": "Ada"},
                "text": "/progress"
            }
        }"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(update.update_id, 1001);
        assert_eq!(message.chat.id, ChatId(-100123));
        assert_eq!(message.message_id, MessageId(7));
        assert_eq!(message.from.unwrap().display_name(), "Ada");
        assert_eq!(message.text.as_deref(), Some("/progress"));
    }

    #[test]
    fn test_parse_error_envelope() {
        let json = r#"{
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 12",
            "parameters": {"retry_after": 12}
        }"#;
        let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(!envelope.ok);
        assert!(envelope.result.is_none());
        assert_eq!(envelope.error_code, Some(429));
        assert_eq!(envelope.parameters.unwrap().retry_after, Some(12));
    }

    #[test]
    fn test_params_serialize_without_parse_mode() {
        let params = EditMessageTextParams {
            chat_id: ChatId(5),
            message_id: MessageId(6),
            text: "█░ 50%",
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["chat_id"], 5);
        assert_eq!(value["message_id"], 6);
        assert!(value.get("parse_mode").is_none());
    }

    #[test]
    fn test_get_updates_params_skip_missing_offset() {
        let params = GetUpdatesParams {
            offset: None,
            timeout: 30,
            allowed_updates: &["message"],
        };
        let value = serde_json::to_value(&params).unwrap();
        assert!(value.get("offset").is_none());
        assert_eq!(value["allowed_updates"][0], "message");
    }
}
