//! Outcome reporter adapters.

use crate::ports::outbound::OutcomeReporter;
use async_trait::async_trait;
use parking_lot::RwLock;
use shared_bus::{EventPublisher, InMemoryEventBus, LedgerEvent};
use shared_types::{CommitEvent, Outcome};
use std::sync::Arc;
use tracing::{debug, info};

/// Publishes every lifecycle event to the event bus as `LedgerEvent::Commit`.
pub struct EventBusOutcomeReporter {
    event_bus: Arc<InMemoryEventBus>,
}

impl EventBusOutcomeReporter {
    pub fn new(event_bus: Arc<InMemoryEventBus>) -> Self {
        Self { event_bus }
    }
}

#[async_trait]
impl OutcomeReporter for EventBusOutcomeReporter {
    async fn report(&self, event: CommitEvent) {
        let session_id = event.session_id;
        let state = event.state;
        if let Some(outcome) = &event.outcome {
            info!(
                %session_id,
                site = %event.site,
                outcome = outcome.kind(),
                "[lp-01] 📤 Publishing terminal commit event"
            );
        }

        let receivers = self.event_bus.publish(LedgerEvent::Commit(event)).await;
        if receivers == 0 {
            debug!(%session_id, %state, "[lp-01] No subscribers for commit event");
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOutcomeReporter;

#[async_trait]
impl OutcomeReporter for NoopOutcomeReporter {
    async fn report(&self, _event: CommitEvent) {}
}

/// In-memory reporter for tests and diagnostics.
#[derive(Default)]
pub struct RecordingOutcomeReporter {
    events: RwLock<Vec<CommitEvent>>,
}

impl RecordingOutcomeReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every event received, in order.
    pub fn events(&self) -> Vec<CommitEvent> {
        self.events.read().clone()
    }

    /// Outcomes of terminal events, in order.
    pub fn outcomes(&self) -> Vec<Outcome> {
        self.events
            .read()
            .iter()
            .filter_map(|e| e.outcome.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

#[async_trait]
impl OutcomeReporter for RecordingOutcomeReporter {
    async fn report(&self, event: CommitEvent) {
        self.events.write().push(event);
    }
}
