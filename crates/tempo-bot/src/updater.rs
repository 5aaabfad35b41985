//! The continuous-update loop.
//!
//! One loop runs per active conversation. Each iteration waits out the current
//! pause (racing the session's cancellation token), checks that its generation
//! is still the live one, renders a fresh payload and edits the tracked
//! message in place. The edit's outcome decides the next pause:
//!
//! | Outcome                             | Next step                            |
//! |-------------------------------------|--------------------------------------|
//! | success, `NotModified`              | `update_interval`                    |
//! | `RateLimited { retry_after }`       | `max(rate_limit_backoff, retry_after)` |
//! | `MessageNotFound`, `MessageNotEditable`, `Forbidden` | deactivate and exit |
//! | anything else                       | `error_backoff`                      |
//!
//! The first edit happens one interval after the initial send, so it never
//! repeats the text that was just delivered.

use std::sync::Arc;
use std::time::Duration;

use tempo_core::log_session_event;
use tempo_render::{DEFAULT_UPDATE_INTERVAL_SECS, StatusRenderer};
use tempo_telegram::{ErrorKind, MessageId, MessageTransport, TransportError};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::clock::Clock;
use crate::session::{LoopTicket, SessionRegistry};

/// Minimum pause after provider flood control (seconds).
pub const DEFAULT_RATE_LIMIT_BACKOFF_SECS: u64 = 30;

/// Pause after an unclassified failure (seconds).
pub const DEFAULT_ERROR_BACKOFF_SECS: u64 = 10;

/// Pauses used by the update loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    pub update_interval: Duration,
    pub rate_limit_backoff: Duration,
    pub error_backoff: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            update_interval: Duration::from_secs(DEFAULT_UPDATE_INTERVAL_SECS),
            rate_limit_backoff: Duration::from_secs(DEFAULT_RATE_LIMIT_BACKOFF_SECS),
            error_backoff: Duration::from_secs(DEFAULT_ERROR_BACKOFF_SECS),
        }
    }
}

/// Why a loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Stopped by command, or superseded by a newer start
    Stopped,
    /// The tracked message can no longer be edited
    Terminal(ErrorKind),
}

/// What to do after one edit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Sleep for the given pause, then edit again
    Continue(Duration),
    /// Deactivate the session and exit
    Exit(ErrorKind),
}

impl LoopTiming {
    /// Decide the next step from an edit outcome.
    pub fn next_step(&self, outcome: &Result<(), TransportError>) -> Step {
        let err = match outcome {
            Ok(()) => return Step::Continue(self.update_interval),
            Err(err) => err,
        };

        if err.is_terminal() {
            return Step::Exit(err.kind());
        }

        match err.kind() {
            ErrorKind::NotModified => Step::Continue(self.update_interval),
            ErrorKind::RateLimited => {
                let suggested = err.retry_after().unwrap_or_default();
                Step::Continue(self.rate_limit_backoff.max(suggested))
            }
            _ => Step::Continue(self.error_backoff),
        }
    }
}

fn renderer_for(timing: &LoopTiming) -> StatusRenderer {
    StatusRenderer::default().with_update_interval(timing.update_interval.as_secs())
}

/// Launches and runs update loops.
#[derive(Clone)]
pub struct Updater {
    transport: Arc<dyn MessageTransport>,
    sessions: Arc<SessionRegistry>,
    renderer: StatusRenderer,
    clock: Arc<dyn Clock>,
    timing: LoopTiming,
}

impl Updater {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        sessions: Arc<SessionRegistry>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let timing = LoopTiming::default();
        Self {
            transport,
            sessions,
            renderer: renderer_for(&timing),
            clock,
            timing,
        }
    }

    /// Override the loop pauses. The message footer follows the new interval.
    pub fn with_timing(mut self, timing: LoopTiming) -> Self {
        self.renderer = renderer_for(&timing);
        self.timing = timing;
        self
    }

    pub fn timing(&self) -> LoopTiming {
        self.timing
    }

    /// Render the payload for the current instant.
    pub fn render_now(&self) -> String {
        self.renderer.render(self.clock.now())
    }

    /// Spawn a loop editing `message` for the ticket's conversation.
    ///
    /// The live-loop count is incremented before this returns.
    pub fn spawn(&self, ticket: LoopTicket, message: MessageId) -> JoinHandle<LoopExit> {
        let guard = self.sessions.enter_loop();
        let updater = self.clone();
        tokio::spawn(async move {
            let _guard = guard;
            updater.run(ticket, message).await
        })
    }

    /// Run the loop until it is stopped or the message becomes uneditable.
    pub async fn run(&self, ticket: LoopTicket, message: MessageId) -> LoopExit {
        let chat = ticket.chat;
        let mut pause = self.timing.update_interval;

        log_session_event!(chat, "loop_started", message_id = %message, generation = ticket.generation);

        loop {
            tokio::select! {
                biased;
                _ = ticket.cancellation().cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }

            if !self.sessions.is_current(&ticket) {
                break;
            }

            let text = self.render_now();
            let outcome = self.transport.edit(chat, message, &text).await;

            match self.timing.next_step(&outcome) {
                Step::Continue(next) => {
                    match &outcome {
                        Ok(()) => debug!(chat_id = %chat, message_id = %message, "message updated"),
                        Err(err) if err.is_rate_limit() => warn!(
                            chat_id = %chat,
                            backoff_secs = next.as_secs(),
                            "Flood control detected, backing off"
                        ),
                        Err(TransportError::NotModified) => {
                            debug!(chat_id = %chat, "message unchanged")
                        }
                        Err(err) => error!(
                            chat_id = %chat,
                            message_id = %message,
                            error = %err,
                            backoff_secs = next.as_secs(),
                            "Failed to update message"
                        ),
                    }
                    pause = next;
                }
                Step::Exit(kind) => {
                    self.sessions.finish(&ticket);
                    log_session_event!(
                        chat,
                        "loop_terminated",
                        message_id = %message,
                        generation = ticket.generation,
                        reason = ?kind
                    );
                    return LoopExit::Terminal(kind);
                }
            }
        }

        log_session_event!(chat, "loop_stopped", generation = ticket.generation);
        LoopExit::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use tempo_telegram::MockTransport;

    fn timing() -> LoopTiming {
        LoopTiming::default()
    }

    #[test]
    fn test_default_timing() {
        let t = timing();
        assert_eq!(t.update_interval, Duration::from_secs(5));
        assert_eq!(t.rate_limit_backoff, Duration::from_secs(30));
        assert_eq!(t.error_backoff, Duration::from_secs(10));
    }

    #[test]
    fn test_success_and_not_modified_use_interval() {
        assert_eq!(timing().next_step(&Ok(())), Step::Continue(Duration::from_secs(5)));
        assert_eq!(
            timing().next_step(&Err(TransportError::NotModified)),
            Step::Continue(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_rate_limit_waits_at_least_backoff() {
        let short = Err(TransportError::RateLimited {
            retry_after: Some(Duration::from_secs(3)),
        });
        assert_eq!(timing().next_step(&short), Step::Continue(Duration::from_secs(30)));

        let long = Err(TransportError::RateLimited {
            retry_after: Some(Duration::from_secs(45)),
        });
        assert_eq!(timing().next_step(&long), Step::Continue(Duration::from_secs(45)));

        let unknown = Err(TransportError::RateLimited { retry_after: None });
        assert_eq!(timing().next_step(&unknown), Step::Continue(Duration::from_secs(30)));
    }

    #[test]
    fn test_terminal_errors_exit() {
        let cases = [
            (
                TransportError::MessageNotFound("gone".into()),
                ErrorKind::MessageNotFound,
            ),
            (
                TransportError::MessageNotEditable("old".into()),
                ErrorKind::MessageNotEditable,
            ),
            (TransportError::Forbidden("blocked".into()), ErrorKind::Forbidden),
        ];
        for (err, kind) in cases {
            assert_eq!(timing().next_step(&Err(err)), Step::Exit(kind));
        }
    }

    #[test]
    fn test_footer_follows_update_interval() {
        let clock = Arc::new(SystemClock::new(chrono::FixedOffset::east_opt(0).unwrap()));
        let updater = Updater::new(
            Arc::new(MockTransport::new()),
            Arc::new(SessionRegistry::new()),
            clock,
        );
        assert!(updater.render_now().ends_with("🔄 Updates every 5 seconds"));

        let updater = updater.with_timing(LoopTiming {
            update_interval: Duration::from_secs(10),
            ..LoopTiming::default()
        });
        assert_eq!(updater.timing().update_interval, Duration::from_secs(10));
        assert!(updater.render_now().ends_with("🔄 Updates every 10 seconds"));
    }

    #[test]
    fn test_other_errors_back_off() {
        let err = Err(TransportError::Api {
            code: 500,
            description: "Internal Server Error".into(),
        });
        assert_eq!(timing().next_step(&err), Step::Continue(Duration::from_secs(10)));

        let err = Err(TransportError::Unauthorized("revoked".into()));
        assert_eq!(timing().next_step(&err), Step::Continue(Duration::from_secs(10)));
    }
}
