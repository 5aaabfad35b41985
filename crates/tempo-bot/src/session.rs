//! Per-conversation session state.
//!
//! The [`SessionRegistry`] owns one [`Session`] per chat that has ever asked
//! for live progress. Command handlers mutate it and update loops read it.
//! Every method takes the lock for a short, synchronous critical section; no
//! guard is ever held across an `.await`.
//!
//! ## Lifecycle
//!
//! ```text
//!   Idle ──try_begin──▶ Starting ──confirm──▶ Running
//!    ▲                     │                    │
//!    └────── abort ────────┘                    │
//!    └────────────── stop / finish ─────────────┘
//! ```
//!
//! Each `try_begin` bumps the session's generation and issues a fresh
//! cancellation token. A loop holds a [`LoopTicket`] for the generation it was
//! started with, so a loop left over from an earlier start can neither keep
//! editing nor deactivate the session that replaced it.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tempo_telegram::{ChatId, MessageId};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Starting,
    Running,
}

/// One conversation's live-progress state.
#[derive(Debug)]
struct Session {
    phase: Phase,
    tracked_message: Option<MessageId>,
    generation: u64,
    cancel: CancellationToken,
}

impl Session {
    fn new() -> Self {
        Self {
            phase: Phase::Idle,
            tracked_message: None,
            generation: 0,
            cancel: CancellationToken::new(),
        }
    }

    fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }
}

/// Read-only view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub active: bool,
    pub tracked_message: Option<MessageId>,
    pub generation: u64,
}

/// Proof that a loop was started for one generation of a session.
#[derive(Debug, Clone)]
pub struct LoopTicket {
    pub chat: ChatId,
    pub generation: u64,
    cancel: CancellationToken,
}

impl LoopTicket {
    /// Token cancelled when this generation is stopped or replaced.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Decrements the live-loop count when an update loop ends.
#[derive(Debug)]
pub struct LiveLoopGuard {
    counter: Arc<AtomicUsize>,
}

impl Drop for LiveLoopGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Owned map of sessions keyed by chat.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<ChatId, Session>>,
    live_loops: Arc<AtomicUsize>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the chat has a running (or starting) loop.
    pub fn is_active(&self, chat: ChatId) -> bool {
        self.sessions
            .lock()
            .get(&chat)
            .is_some_and(Session::is_active)
    }

    /// Reserve the chat for a new loop.
    ///
    /// Returns `None` if the chat is already active; the caller must then take
    /// no further action.
    pub fn try_begin(&self, chat: ChatId) -> Option<LoopTicket> {
        let mut sessions = self.sessions.lock();
        let session = sessions.entry(chat).or_insert_with(Session::new);
        if session.is_active() {
            return None;
        }

        session.phase = Phase::Starting;
        session.generation += 1;
        session.cancel = CancellationToken::new();

        Some(LoopTicket {
            chat,
            generation: session.generation,
            cancel: session.cancel.clone(),
        })
    }

    /// Record the initial message and mark the session running.
    ///
    /// Returns false if the reservation was stopped while the message was
    /// being sent; the loop must not be launched in that case.
    pub fn confirm(&self, ticket: &LoopTicket, message: MessageId) -> bool {
        let mut sessions = self.sessions.lock();
        match sessions.get_mut(&ticket.chat) {
            Some(session)
                if session.generation == ticket.generation
                    && session.phase == Phase::Starting
                    && !ticket.cancel.is_cancelled() =>
            {
                session.phase = Phase::Running;
                session.tracked_message = Some(message);
                true
            }
            _ => false,
        }
    }

    /// Release a reservation whose initial message could not be sent.
    pub fn abort(&self, ticket: &LoopTicket) {
        let mut sessions = self.sessions.lock();
        if let Some(session) = sessions.get_mut(&ticket.chat)
            && session.generation == ticket.generation
            && session.phase == Phase::Starting
        {
            session.phase = Phase::Idle;
            session.cancel.cancel();
        }
    }

    /// Stop whatever is active in the chat.
    ///
    /// Returns false, without touching anything, if nothing was active.
    pub fn stop(&self, chat: ChatId) -> bool {
        let mut sessions = self.sessions.lock();
        match sessions.get_mut(&chat) {
            Some(session) if session.is_active() => {
                session.phase = Phase::Idle;
                session.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    /// End a loop from the inside (e.g. the message was deleted).
    ///
    /// Only deactivates the session if the ticket is still its current
    /// generation. Returns whether anything changed.
    pub fn finish(&self, ticket: &LoopTicket) -> bool {
        let mut sessions = self.sessions.lock();
        match sessions.get_mut(&ticket.chat) {
            Some(session) if session.generation == ticket.generation && session.is_active() => {
                session.phase = Phase::Idle;
                session.cancel.cancel();
                true
            }
            _ => false,
        }
    }

    /// Whether a loop holding `ticket` should keep running.
    pub fn is_current(&self, ticket: &LoopTicket) -> bool {
        if ticket.cancel.is_cancelled() {
            return false;
        }
        self.sessions.lock().get(&ticket.chat).is_some_and(|s| {
            s.generation == ticket.generation && s.phase == Phase::Running
        })
    }

    /// Message currently tracked for the chat.
    pub fn tracked_message(&self, chat: ChatId) -> Option<MessageId> {
        self.sessions.lock().get(&chat).and_then(|s| s.tracked_message)
    }

    /// Snapshot of one session, if the chat ever started one.
    pub fn snapshot(&self, chat: ChatId) -> Option<SessionSnapshot> {
        self.sessions.lock().get(&chat).map(|s| SessionSnapshot {
            active: s.is_active(),
            tracked_message: s.tracked_message,
            generation: s.generation,
        })
    }

    /// Number of chats currently active.
    pub fn active_count(&self) -> usize {
        self.sessions
            .lock()
            .values()
            .filter(|s| s.is_active())
            .count()
    }

    /// Count a newly launched loop; the count drops when the guard does.
    pub fn enter_loop(&self) -> LiveLoopGuard {
        self.live_loops.fetch_add(1, Ordering::SeqCst);
        LiveLoopGuard {
            counter: Arc::clone(&self.live_loops),
        }
    }

    /// Number of update loop tasks that have not yet exited.
    pub fn live_loops(&self) -> usize {
        self.live_loops.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT: ChatId = ChatId(10);

    #[test]
    fn test_begin_confirm_stop() {
        let registry = SessionRegistry::new();
        assert!(!registry.is_active(CHAT));

        let ticket = registry.try_begin(CHAT).unwrap();
        assert_eq!(ticket.generation, 1);
        assert!(registry.is_active(CHAT));
        assert!(!registry.is_current(&ticket));

        assert!(registry.confirm(&ticket, MessageId(5)));
        assert!(registry.is_current(&ticket));
        assert_eq!(registry.tracked_message(CHAT), Some(MessageId(5)));

        assert!(registry.stop(CHAT));
        assert!(!registry.is_active(CHAT));
        assert!(!registry.is_current(&ticket));
        assert!(ticket.cancellation().is_cancelled());
    }

    #[test]
    fn test_second_begin_is_refused_while_active() {
        let registry = SessionRegistry::new();
        let ticket = registry.try_begin(CHAT).unwrap();
        assert!(registry.try_begin(CHAT).is_none());
        registry.confirm(&ticket, MessageId(1));
        assert!(registry.try_begin(CHAT).is_none());
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn test_stop_when_idle_changes_nothing() {
        let registry = SessionRegistry::new();
        assert!(!registry.stop(CHAT));
        assert!(registry.snapshot(CHAT).is_none());

        let ticket = registry.try_begin(CHAT).unwrap();
        registry.confirm(&ticket, MessageId(3));
        registry.stop(CHAT);
        let before = registry.snapshot(CHAT);
        assert!(!registry.stop(CHAT));
        assert_eq!(registry.snapshot(CHAT), before);
    }

    #[test]
    fn test_abort_releases_reservation() {
        let registry = SessionRegistry::new();
        let ticket = registry.try_begin(CHAT).unwrap();
        registry.abort(&ticket);
        assert!(!registry.is_active(CHAT));
        assert!(registry.try_begin(CHAT).is_some());
    }

    #[test]
    fn test_confirm_after_stop_is_rejected() {
        let registry = SessionRegistry::new();
        let ticket = registry.try_begin(CHAT).unwrap();
        assert!(registry.stop(CHAT));
        assert!(!registry.confirm(&ticket, MessageId(9)));
        assert!(!registry.is_active(CHAT));
    }

    #[test]
    fn test_stale_ticket_cannot_finish_new_generation() {
        let registry = SessionRegistry::new();
        let old = registry.try_begin(CHAT).unwrap();
        registry.confirm(&old, MessageId(1));
        registry.stop(CHAT);

        let new = registry.try_begin(CHAT).unwrap();
        registry.confirm(&new, MessageId(2));
        assert_eq!(new.generation, 2);

        assert!(!registry.is_current(&old));
        assert!(!registry.finish(&old));
        assert!(registry.is_current(&new));
        assert_eq!(registry.tracked_message(CHAT), Some(MessageId(2)));

        assert!(registry.finish(&new));
        assert!(!registry.is_active(CHAT));
    }

    #[test]
    fn test_sessions_are_isolated_per_chat() {
        let registry = SessionRegistry::new();
        let a = registry.try_begin(ChatId(1)).unwrap();
        let b = registry.try_begin(ChatId(2)).unwrap();
        registry.confirm(&a, MessageId(1));
        registry.confirm(&b, MessageId(1));

        registry.stop(ChatId(1));
        assert!(!registry.is_current(&a));
        assert!(registry.is_current(&b));
        assert_eq!(registry.active_count(), 1);
    }

    #[test]
    fn test_live_loop_guard_counts() {
        let registry = SessionRegistry::new();
        let g1 = registry.enter_loop();
        let g2 = registry.enter_loop();
        assert_eq!(registry.live_loops(), 2);
        drop(g1);
        assert_eq!(registry.live_loops(), 1);
        drop(g2);
        assert_eq!(registry.live_loops(), 0);
    }
}
