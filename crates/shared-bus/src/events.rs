//! # Ledger Events
//!
//! Defines all event types that flow through the shared bus: confirmation
//! notices coming from the ledger feed and lifecycle events emitted by
//! commit sessions.

use serde::{Deserialize, Serialize};
use shared_types::{ActionSite, CommitEvent, CommitLevel, ConfirmationNotice, OperationReference};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LedgerEvent {
    // =========================================================================
    // LEDGER FEED
    // =========================================================================
    /// An operation reached a commitment level (possibly with an error).
    /// Source: ledger feed | Consumed by: confirmation watchers
    OperationNotice(ConfirmationNotice),

    // =========================================================================
    // COMMIT COORDINATOR (lp-01)
    // =========================================================================
    /// A commit session entered a new state.
    /// Source: lp-01 | Consumed by: outcome reporters
    Commit(CommitEvent),
}

impl LedgerEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::OperationNotice(_) => EventTopic::Confirmation,
            Self::Commit(_) => EventTopic::CommitLifecycle,
        }
    }

    /// The operation reference the event is about, if known.
    #[must_use]
    pub fn reference(&self) -> Option<&OperationReference> {
        match self {
            Self::OperationNotice(notice) => Some(&notice.reference),
            Self::Commit(event) => event.reference.as_ref(),
        }
    }

    /// The action site that produced the event, if any.
    #[must_use]
    pub fn site(&self) -> Option<ActionSite> {
        match self {
            Self::OperationNotice(_) => None,
            Self::Commit(event) => Some(event.site),
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Ledger confirmation notices.
    Confirmation,
    /// Commit session lifecycle events.
    CommitLifecycle,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// References to include. Empty means any reference.
    pub references: Vec<OperationReference>,
    /// Action sites to include. Empty means any site.
    pub sites: Vec<ActionSite>,
    /// Minimum commitment level a notice must reach.
    pub min_level: Option<CommitLevel>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            ..Self::default()
        }
    }

    /// Notices for one operation at or above `level`.
    #[must_use]
    pub fn notices_for(reference: OperationReference, level: CommitLevel) -> Self {
        Self {
            topics: vec![EventTopic::Confirmation],
            references: vec![reference],
            sites: Vec::new(),
            min_level: Some(level),
        }
    }

    /// Lifecycle events from specific action sites.
    #[must_use]
    pub fn commits_from(sites: Vec<ActionSite>) -> Self {
        Self {
            topics: vec![EventTopic::CommitLifecycle],
            sites,
            ..Self::default()
        }
    }

    /// Whether events on `topic` can pass this filter.
    #[must_use]
    pub fn wants(&self, topic: EventTopic) -> bool {
        self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&topic)
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        let topic_match = self.wants(event.topic());

        let reference_match = self.references.is_empty()
            || event
                .reference()
                .is_some_and(|r| self.references.contains(r));

        let site_match =
            self.sites.is_empty() || event.site().is_some_and(|s| self.sites.contains(&s));

        let level_match = match (self.min_level, event) {
            (Some(min), LedgerEvent::OperationNotice(notice)) => notice.level.satisfies(min),
            _ => true,
        };

        topic_match && reference_match && site_match && level_match
    }
}
