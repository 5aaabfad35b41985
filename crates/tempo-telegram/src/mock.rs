//! In-memory transport for tests.
//!
//! [`MockTransport`] records every send and edit, assigns increasing message
//! ids, and plays back scripted edit outcomes and update batches. It makes no
//! external calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use ::async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::error::{Result, TransportError};
use crate::transport::{MessageTransport, UpdateSource};
use crate::types::{ChatId, MessageId, Update};

/// A message passed to [`MessageTransport::send`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat: ChatId,
    pub message: MessageId,
    pub text: String,
}

/// A call to [`MessageTransport::edit`], successful or not.
#[derive(Debug, Clone)]
pub struct EditAttempt {
    pub chat: ChatId,
    pub message: MessageId,
    pub text: String,
    /// Tokio time of the call, so paused-clock tests can measure gaps.
    pub at: Instant,
    pub succeeded: bool,
}

/// Mock transport.
pub struct MockTransport {
    next_message_id: AtomicI64,
    sent: Mutex<Vec<SentMessage>>,
    edits: Mutex<Vec<EditAttempt>>,
    send_failures: Mutex<VecDeque<TransportError>>,
    edit_script: Mutex<VecDeque<Result<()>>>,
    update_batches: Mutex<VecDeque<Result<Vec<Update>>>>,
    dropped_pending: Mutex<u32>,
    idle_poll_delay: Duration,
}

impl MockTransport {
    /// Create a mock whose sends and edits always succeed.
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicI64::new(1),
            sent: Mutex::new(Vec::new()),
            edits: Mutex::new(Vec::new()),
            send_failures: Mutex::new(VecDeque::new()),
            edit_script: Mutex::new(VecDeque::new()),
            update_batches: Mutex::new(VecDeque::new()),
            dropped_pending: Mutex::new(0),
            idle_poll_delay: Duration::from_secs(1),
        }
    }

    /// Queue outcomes for the next edits, in order. Once drained, edits succeed.
    pub fn with_edit_results(self, results: impl IntoIterator<Item = Result<()>>) -> Self {
        self.edit_script.lock().extend(results);
        self
    }

    /// Make the next send fail with `err`.
    pub fn fail_next_send(&self, err: TransportError) {
        self.send_failures.lock().push_back(err);
    }

    /// Queue a batch returned by the next [`UpdateSource::updates`] call.
    pub fn push_updates(&self, batch: Vec<Update>) {
        self.update_batches.lock().push_back(Ok(batch));
    }

    /// Make the next [`UpdateSource::updates`] call fail.
    pub fn push_updates_error(&self, err: TransportError) {
        self.update_batches.lock().push_back(Err(err));
    }

    /// Set how long an `updates` call waits when nothing is queued.
    pub fn with_idle_poll_delay(mut self, delay: Duration) -> Self {
        self.idle_poll_delay = delay;
        self
    }

    /// Messages sent so far.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    /// Texts sent to one chat, in order.
    pub fn sent_texts(&self, chat: ChatId) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|m| m.chat == chat)
            .map(|m| m.text.clone())
            .collect()
    }

    /// Edit attempts so far.
    pub fn edits(&self) -> Vec<EditAttempt> {
        self.edits.lock().clone()
    }

    /// Number of edit attempts so far.
    pub fn edit_count(&self) -> usize {
        self.edits.lock().len()
    }

    /// Number of `drop_pending` calls.
    pub fn dropped_pending_count(&self) -> u32 {
        *self.dropped_pending.lock()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn send(&self, chat: ChatId, text: &str) -> Result<MessageId> {
        if let Some(err) = self.send_failures.lock().pop_front() {
            return Err(err);
        }

        let message = MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst));
        self.sent.lock().push(SentMessage {
            chat,
            message,
            text: text.to_string(),
        });
        Ok(message)
    }

    async fn edit(&self, chat: ChatId, message: MessageId, text: &str) -> Result<()> {
        let outcome = self.edit_script.lock().pop_front().unwrap_or(Ok(()));
        self.edits.lock().push(EditAttempt {
            chat,
            message,
            text: text.to_string(),
            at: Instant::now(),
            succeeded: outcome.is_ok(),
        });
        outcome
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[async_trait]
impl UpdateSource for MockTransport {
    async fn updates(&self, offset: Option<i64>) -> Result<Vec<Update>> {
        let next = self.update_batches.lock().pop_front();
        match next {
            Some(Ok(batch)) => Ok(batch
                .into_iter()
                .filter(|u| offset.is_none_or(|o| u.update_id >= o))
                .collect()),
            Some(Err(err)) => Err(err),
            None => {
                tokio::time::sleep(self.idle_poll_delay).await;
                Ok(Vec::new())
            }
        }
    }

    async fn drop_pending(&self) -> Result<()> {
        *self.dropped_pending.lock() += 1;
        Ok(())
    }
}
