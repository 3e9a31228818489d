//! Confirmation Watcher
//!
//! Bridges the callback-style [`SubscriptionService`] to a future. The
//! returned [`PendingConfirmation`] resolves with the first notice for the
//! reference; if the feed goes away without a notice it never resolves.
//!
//! Cancelling is idempotent: `SubscriptionService::cancel` runs at most once
//! per subscription, whether cancel is called explicitly, repeatedly, after
//! the notice arrived, or implicitly by dropping the handle.

use crate::error::{CommitError, CommitResult};
use crate::ports::outbound::{NotificationCallback, SubscriptionHandle, SubscriptionService};
use shared_types::{CommitLevel, ConfirmationNotice, OperationReference};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::debug;

/// Registers listeners on the subscription service.
pub struct ConfirmationWatcher<N: SubscriptionService> {
    subscriptions: Arc<N>,
}

impl<N: SubscriptionService> ConfirmationWatcher<N> {
    pub fn new(subscriptions: Arc<N>) -> Self {
        Self { subscriptions }
    }

    /// Start watching `reference` for `level`.
    pub fn watch(
        &self,
        reference: &OperationReference,
        level: CommitLevel,
    ) -> CommitResult<PendingConfirmation<N>> {
        let (sender, receiver) = oneshot::channel();
        let callback: NotificationCallback = Box::new(move |notice| {
            // Receiver gone means the session already finished.
            let _ = sender.send(notice);
        });

        let handle = self
            .subscriptions
            .on_notification(reference, level, callback)
            .map_err(|e| CommitError::Subscription {
                reason: e.to_string(),
            })?;

        debug!(%reference, level = %level, "[lp-01] watching for confirmation");

        Ok(PendingConfirmation {
            receiver: Some(receiver),
            handle: WatchHandle {
                handle,
                subscriptions: Arc::clone(&self.subscriptions),
                cancelled: false,
            },
        })
    }
}

impl<N: SubscriptionService> Clone for ConfirmationWatcher<N> {
    fn clone(&self) -> Self {
        Self {
            subscriptions: Arc::clone(&self.subscriptions),
        }
    }
}

/// Owns one subscription; removes it at most once.
pub struct WatchHandle<N: SubscriptionService> {
    handle: SubscriptionHandle,
    subscriptions: Arc<N>,
    cancelled: bool,
}

impl<N: SubscriptionService> WatchHandle<N> {
    pub fn id(&self) -> SubscriptionHandle {
        self.handle
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Remove the subscription. Later calls do nothing.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        self.subscriptions.cancel(self.handle);
        debug!(handle = self.handle.0, "[lp-01] subscription cancelled");
    }
}

impl<N: SubscriptionService> Drop for WatchHandle<N> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Future of the notice for one reference.
pub struct PendingConfirmation<N: SubscriptionService> {
    receiver: Option<oneshot::Receiver<ConfirmationNotice>>,
    handle: WatchHandle<N>,
}

impl<N: SubscriptionService> PendingConfirmation<N> {
    pub fn handle(&self) -> &WatchHandle<N> {
        &self.handle
    }

    /// Cancel the underlying subscription. Safe after settlement.
    pub fn cancel(&mut self) {
        self.receiver = None;
        self.handle.cancel();
    }
}

impl<N: SubscriptionService> Future for PendingConfirmation<N> {
    type Output = ConfirmationNotice;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<ConfirmationNotice> {
        let Some(receiver) = self.receiver.as_mut() else {
            return Poll::Pending;
        };
        match Pin::new(receiver).poll(cx) {
            Poll::Ready(Ok(notice)) => {
                self.receiver = None;
                Poll::Ready(notice)
            }
            Poll::Ready(Err(_)) => {
                // Callback dropped without firing: the feed is gone.
                debug!(handle = self.handle.handle.0, "[lp-01] notification feed closed");
                self.receiver = None;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
