//! # Subscription
//!
//! Receiving side of the bus. Filtering happens here, after the channel.

use crate::events::{EventFilter, LedgerEvent};
use thiserror::Error;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    #[error("Event bus closed")]
    Closed,
}

/// Filtered view over the channels of an [`InMemoryEventBus`].
///
/// Dropping it releases the receivers.
///
/// [`InMemoryEventBus`]: crate::InMemoryEventBus
pub struct Subscription {
    filter: EventFilter,
    notices: Option<broadcast::Receiver<LedgerEvent>>,
    commits: Option<broadcast::Receiver<LedgerEvent>>,
}

impl Subscription {
    pub(crate) fn new(
        filter: EventFilter,
        notices: Option<broadcast::Receiver<LedgerEvent>>,
        commits: Option<broadcast::Receiver<LedgerEvent>>,
    ) -> Self {
        Self {
            filter,
            notices,
            commits,
        }
    }

    /// Next event matching the filter, or `None` once the bus is gone.
    ///
    /// Notices are drained ahead of lifecycle events.
    pub async fn recv(&mut self) -> Option<LedgerEvent> {
        loop {
            let received = tokio::select! {
                biased;
                r = next(&mut self.notices) => r,
                r = next(&mut self.commits) => r,
            };
            match received {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => lagged(&self.filter, skipped),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking [`recv`](Self::recv). `Ok(None)` means nothing is queued.
    pub fn try_recv(&mut self) -> Result<Option<LedgerEvent>, SubscriptionError> {
        for receiver in [&mut self.notices, &mut self.commits].into_iter().flatten() {
            loop {
                match receiver.try_recv() {
                    Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                    Ok(_) => {}
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Lagged(skipped)) => lagged(&self.filter, skipped),
                    Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
                }
            }
        }
        Ok(None)
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

fn lagged(filter: &EventFilter, skipped: u64) {
    warn!(skipped, topics = ?filter.topics, "Subscriber lagged, events dropped");
}

async fn next(
    receiver: &mut Option<broadcast::Receiver<LedgerEvent>>,
) -> Result<LedgerEvent, RecvError> {
    match receiver {
        Some(receiver) => receiver.recv().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventTopic;
    use crate::{EventPublisher, InMemoryEventBus};
    use shared_types::{
        ActionSite, CommitEvent, CommitLevel, ConfirmationNotice, OperationReference,
        SessionState, Timestamp,
    };
    use std::time::Duration;
    use tokio::time::timeout;

    fn notice(reference: &str) -> LedgerEvent {
        LedgerEvent::OperationNotice(ConfirmationNotice::success(
            OperationReference::new(reference),
            CommitLevel::Confirmed,
        ))
    }

    fn commit_event() -> LedgerEvent {
        LedgerEvent::Commit(CommitEvent {
            session_id: uuid::Uuid::new_v4(),
            site: ActionSite::TicketPurchase,
            state: SessionState::Signing,
            reference: None,
            outcome: None,
            at: Timestamp::from_millis(1),
        })
    }

    #[tokio::test]
    async fn test_subscription_filter() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::notices_for(
            OperationReference::new("wanted"),
            CommitLevel::Confirmed,
        ));

        bus.publish(commit_event()).await;
        bus.publish(notice("other")).await;
        bus.publish(notice("wanted")).await;

        let received = timeout(Duration::from_millis(100), sub.recv())
            .await
            .expect("timeout")
            .expect("event");

        assert_eq!(
            received.reference(),
            Some(&OperationReference::new("wanted"))
        );
    }

    #[tokio::test]
    async fn test_recv_sees_both_topics() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());

        bus.publish(commit_event()).await;
        bus.publish(notice("a")).await;

        let first = sub.recv().await.expect("event");
        let second = sub.recv().await.expect("event");
        assert_eq!(first.topic(), EventTopic::Confirmation);
        assert_eq!(second.topic(), EventTopic::CommitLifecycle);
    }

    #[tokio::test]
    async fn test_lagged_subscriber_keeps_receiving() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::Confirmation]));

        for i in 0..crate::DEFAULT_CHANNEL_CAPACITY + 10 {
            bus.publish(notice(&format!("n{i}"))).await;
        }

        // The oldest notices are gone; the newest are still delivered.
        let received = sub.recv().await.expect("event");
        assert_eq!(received.reference(), Some(&OperationReference::new("n10")));
    }

    #[tokio::test]
    async fn test_try_recv_empty() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());

        assert!(matches!(sub.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_try_recv_skips_other_topics() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::topics(vec![EventTopic::CommitLifecycle]));

        bus.publish(notice("a")).await;
        bus.publish(commit_event()).await;

        assert!(matches!(sub.try_recv(), Ok(Some(LedgerEvent::Commit(_)))));
        assert!(matches!(sub.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_bus_dropped() {
        let bus = InMemoryEventBus::new();
        let mut sub = bus.subscribe(EventFilter::all());
        drop(bus);

        assert!(sub.recv().await.is_none());
        assert!(matches!(sub.try_recv(), Err(SubscriptionError::Closed)));
    }
}
