//! Timeout Governor
//!
//! Arms a pure deadline timer on the [`Clock`] port. The returned
//! [`Deadline`] completes with [`Elapsed`] once the duration passes.
//! Cancelling before it fires discards the timer; cancelling after it fired
//! does nothing.

use crate::ports::outbound::{Clock, Elapsed};
use futures::future::BoxFuture;
use futures::FutureExt;
use shared_types::Timestamp;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

/// Factory for deadlines.
pub struct TimeoutGovernor<C: Clock> {
    clock: Arc<C>,
}

impl<C: Clock> TimeoutGovernor<C> {
    pub fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    /// Start a timer for `duration` from now.
    pub fn arm(&self, duration: Duration) -> Deadline {
        Deadline {
            expires_at: self.clock.now().saturating_add(duration),
            timer: Some(self.clock.after(duration)),
            state: DeadlineState::Armed,
        }
    }
}

impl<C: Clock> Clone for TimeoutGovernor<C> {
    fn clone(&self) -> Self {
        Self {
            clock: Arc::clone(&self.clock),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineState {
    Armed,
    Fired,
    Cancelled,
}

/// A running (or finished) deadline timer.
///
/// Once fired or cancelled it stays pending forever if polled again.
pub struct Deadline {
    expires_at: Timestamp,
    timer: Option<BoxFuture<'static, Elapsed>>,
    state: DeadlineState,
}

impl Deadline {
    /// Wall-clock instant the timer fires at.
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    pub fn state(&self) -> DeadlineState {
        self.state
    }

    /// Discard the timer. Returns `false` if it had already fired or been
    /// cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.state != DeadlineState::Armed {
            return false;
        }
        self.timer = None;
        self.state = DeadlineState::Cancelled;
        true
    }
}

impl Future for Deadline {
    type Output = Elapsed;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Elapsed> {
        let Some(timer) = self.timer.as_mut() else {
            return Poll::Pending;
        };
        match timer.poll_unpin(cx) {
            Poll::Ready(elapsed) => {
                self.timer = None;
                self.state = DeadlineState::Fired;
                Poll::Ready(elapsed)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl std::fmt::Debug for Deadline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deadline")
            .field("expires_at", &self.expires_at)
            .field("state", &self.state)
            .finish()
    }
}
