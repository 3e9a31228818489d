//! # In-Memory Bus
//!
//! One broadcast channel per topic. Confirmation notices never share a
//! buffer with lifecycle events, so a burst of lifecycle traffic cannot push
//! a notice out from under a waiting watcher.

use crate::events::{EventFilter, EventTopic, LedgerEvent};
use crate::subscription::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Publishing side of the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish `event`, returning how many receivers it reached.
    async fn publish(&self, event: LedgerEvent) -> usize;
}

/// Process-local bus backed by `tokio::sync::broadcast`.
pub struct InMemoryEventBus {
    notices: broadcast::Sender<LedgerEvent>,
    commits: broadcast::Sender<LedgerEvent>,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        let (notices, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        let (commits, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self { notices, commits }
    }

    /// Subscribe to events matching `filter`.
    ///
    /// Only the channels the filter's topics cover are joined.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        let notices = filter
            .wants(EventTopic::Confirmation)
            .then(|| self.notices.subscribe());
        let commits = filter
            .wants(EventTopic::CommitLifecycle)
            .then(|| self.commits.subscribe());

        debug!(
            topics = ?filter.topics,
            references = filter.references.len(),
            "Subscription created"
        );
        Subscription::new(filter, notices, commits)
    }

    /// Live receivers on `topic`'s channel. `All` sums both channels.
    #[must_use]
    pub fn subscriber_count(&self, topic: EventTopic) -> usize {
        match topic {
            EventTopic::Confirmation => self.notices.receiver_count(),
            EventTopic::CommitLifecycle => self.commits.receiver_count(),
            EventTopic::All => self.notices.receiver_count() + self.commits.receiver_count(),
        }
    }

    fn sender_for(&self, topic: EventTopic) -> &broadcast::Sender<LedgerEvent> {
        match topic {
            EventTopic::Confirmation => &self.notices,
            EventTopic::CommitLifecycle | EventTopic::All => &self.commits,
        }
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: LedgerEvent) -> usize {
        let topic = event.topic();
        match self.sender_for(topic).send(event) {
            Ok(receivers) => {
                debug!(?topic, receivers, "Event published");
                receivers
            }
            Err(_) => {
                // Lifecycle events are routinely published with nobody listening.
                trace!(?topic, "Event dropped (no receivers)");
                0
            }
        }
    }
}
