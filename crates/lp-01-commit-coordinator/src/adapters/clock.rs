//! Tokio clock adapter.
//!
//! Wall-clock readings are anchored once at construction and then advanced
//! by tokio's monotonic clock, so paused-time tests see `now()` move in
//! step with their timers.

use crate::ports::outbound::{Clock, Elapsed};
use futures::future::BoxFuture;
use futures::FutureExt;
use shared_types::Timestamp;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::Instant;

/// Production clock backed by `tokio::time`.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    anchor: Timestamp,
    origin: Instant,
}

impl TokioClock {
    /// Anchor at the current system time.
    #[must_use]
    pub fn new() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self::anchored_at(Timestamp::from_millis(
            u64::try_from(since_epoch.as_millis()).unwrap_or(u64::MAX),
        ))
    }

    /// Anchor at a fixed wall-clock time.
    #[must_use]
    pub fn anchored_at(anchor: Timestamp) -> Self {
        Self {
            anchor,
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Timestamp {
        self.anchor.saturating_add(self.origin.elapsed())
    }

    /// The sleep is created here, so the timer runs from the call, not
    /// from the first poll.
    fn after(&self, duration: Duration) -> BoxFuture<'static, Elapsed> {
        let sleep = tokio::time::sleep(duration);
        async move {
            sleep.await;
            Elapsed
        }
        .boxed()
    }
}
