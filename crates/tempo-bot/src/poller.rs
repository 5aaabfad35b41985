//! Command intake by long polling.
//!
//! [`Poller::run`] drops whatever queued up while the bot was offline, then
//! repeatedly fetches updates, turns text commands into [`CommandEvent`]s and
//! hands them to the [`Dispatcher`] one at a time. The offset always moves past
//! every update received, including ones that carry no command.

use std::sync::Arc;
use std::time::Duration;

use tempo_telegram::{ErrorKind, TransportError, Update, UpdateSource};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::commands::{Command, CommandEvent, Dispatcher};

/// Pause after a failed poll (seconds).
pub const DEFAULT_POLL_RETRY_SECS: u64 = 5;

/// Name used when an update carries no sender.
const UNKNOWN_USER: &str = "there";

/// Extract command events and the next offset from a batch of updates.
///
/// The offset is `None` for an empty batch.
pub fn events_from(updates: &[Update]) -> (Vec<CommandEvent>, Option<i64>) {
    let next_offset = updates.iter().map(|u| u.update_id + 1).max();

    let events = updates
        .iter()
        .filter_map(|update| {
            let message = update.message.as_ref()?;
            let text = message.text.as_deref()?;
            if !text.starts_with('/') {
                return None;
            }

            let Some(command) = Command::parse(text) else {
                debug!(chat_id = %message.chat.id, text, "ignoring unknown command");
                return None;
            };

            let user_display_name = message
                .from
                .as_ref()
                .map(|user| user.display_name().to_string())
                .unwrap_or_else(|| UNKNOWN_USER.to_string());

            Some(CommandEvent {
                chat_id: message.chat.id,
                user_display_name,
                command,
            })
        })
        .collect();

    (events, next_offset)
}

/// Long-polls an [`UpdateSource`] and dispatches commands.
pub struct Poller {
    source: Arc<dyn UpdateSource>,
    dispatcher: Dispatcher,
    retry_delay: Duration,
}

impl Poller {
    pub fn new(source: Arc<dyn UpdateSource>, dispatcher: Dispatcher) -> Self {
        Self {
            source,
            dispatcher,
            retry_delay: Duration::from_secs(DEFAULT_POLL_RETRY_SECS),
        }
    }

    /// Set the pause after a failed poll.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Poll until `shutdown` is cancelled.
    ///
    /// Only a rejected token ends polling with an error; every other failure
    /// is logged and retried.
    pub async fn run(&self, shutdown: CancellationToken) -> Result<(), TransportError> {
        if let Err(err) = self.source.drop_pending().await {
            if err.kind() == ErrorKind::Unauthorized {
                return Err(err);
            }
            warn!(error = %err, "Failed to drop pending updates");
        }

        info!("polling for commands");
        let mut offset = None;

        loop {
            let batch = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                batch = self.source.updates(offset) => batch,
            };

            match batch {
                Ok(updates) => {
                    let (events, next_offset) = events_from(&updates);
                    if next_offset.is_some() {
                        offset = next_offset;
                    }
                    for event in &events {
                        self.dispatch(event).await;
                    }
                }
                Err(err) if err.kind() == ErrorKind::Unauthorized => return Err(err),
                Err(err) => {
                    warn!(
                        error = %err,
                        retry_secs = self.retry_delay.as_secs(),
                        "Polling failed, retrying"
                    );
                    tokio::select! {
                        biased;
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }
        }

        info!("polling stopped");
        Ok(())
    }

    async fn dispatch(&self, event: &CommandEvent) {
        match self.dispatcher.handle(event).await {
            Ok(outcome) => debug!(chat_id = %event.chat_id, ?outcome, "command handled"),
            Err(err) => warn!(
                chat_id = %event.chat_id,
                command = event.command.name(),
                error = %err,
                "Failed to deliver command reply"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(json: serde_json::Value) -> Update {
        serde_json::from_value(json).unwrap()
    }

    fn text_update(update_id: i64, chat: i64, text: &str) -> Update {
        update(serde_json::json!({
            "update_id": update_id,
            "message": {
                "message_id": update_id * 10,
                "date": 0,
                "chat": {"id": chat, "type": "private"},
                "from": {"id": 1, "is_bot": false, "first_name": "Ada"},
                "text": text
            }
        }))
    }

    #[test]
    fn test_events_from_empty_batch() {
        let (events, offset) = events_from(&[]);
        assert!(events.is_empty());
        assert_eq!(offset, None);
    }

    #[test]
    fn test_events_from_commands_and_noise() {
        let updates = vec![
            text_update(7, 100, "/progress@TempoBot"),
            text_update(8, 100, "hello there"),
            text_update(9, 200, "/unknown"),
            update(serde_json::json!({"update_id": 12})),
            text_update(10, 200, "/stop now"),
        ];

        let (events, offset) = events_from(&updates);
        assert_eq!(offset, Some(13));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].command, Command::Progress);
        assert_eq!(events[0].chat_id.0, 100);
        assert_eq!(events[0].user_display_name, "Ada");
        assert_eq!(events[1].command, Command::Stop);
        assert_eq!(events[1].chat_id.0, 200);
    }

    #[test]
    fn test_events_without_sender_use_fallback_name() {
        let updates = vec![update(serde_json::json!({
            "update_id": 1,
            "message": {
                "message_id": 1,
                "date": 0,
                "chat": {"id": -5, "type": "channel"},
                "text": "/start"
            }
        }))];

        let (events, _) = events_from(&updates);
        assert_eq!(events[0].user_display_name, UNKNOWN_USER);
    }
}
