//! Wall-clock source for renders.

use chrono::{DateTime, FixedOffset, Utc};

/// Supplies "now" in the reference zone.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Reads the system clock and converts to a fixed offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Clock that follows tokio's (pausable) time from a fixed starting instant.
///
/// Under `tokio::time::pause` the rendered time advances exactly as far as
/// the runtime's virtual clock, which keeps loop tests deterministic.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    base: DateTime<FixedOffset>,
    started: tokio::time::Instant,
}

impl TokioClock {
    pub fn starting_at(base: DateTime<FixedOffset>) -> Self {
        Self {
            base,
            started: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let elapsed = self.started.elapsed();
        self.base
            + chrono::Duration::from_std(elapsed).unwrap_or(chrono::Duration::zero())
    }
}
