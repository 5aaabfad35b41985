//! Transport traits.
//!
//! [`MessageTransport`] is what the update loop and command handlers talk to;
//! [`UpdateSource`] is what the poller reads inbound messages from. Both are
//! implemented by [`TelegramClient`](crate::client::TelegramClient) and by
//! [`MockTransport`](crate::mock::MockTransport).

use ::async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatId, MessageId, Update};

/// Sends and edits plain-text messages.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Send a new message and return its identifier.
    async fn send(&self, chat: ChatId, text: &str) -> Result<MessageId>;

    /// Replace the whole text of an existing message.
    async fn edit(&self, chat: ChatId, message: MessageId, text: &str) -> Result<()>;

    /// Transport name for logging.
    fn name(&self) -> &str;
}

/// Source of inbound updates.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Fetch updates with `update_id >= offset`, waiting for new ones if none
    /// are pending.
    async fn updates(&self, offset: Option<i64>) -> Result<Vec<Update>>;

    /// Discard everything that queued up while the bot was offline.
    async fn drop_pending(&self) -> Result<()>;
}
