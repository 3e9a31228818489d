//! Lifecycle service
//!
//! Thin wrapper binding the classifier to a [`TimeSource`].

use crate::domain::{
    classify, next_transition_at, CampaignRecord, LifecycleState, ParticipationRecord,
};
use crate::ports::inbound::LifecycleApi;
use crate::ports::outbound::TimeSource;
use shared_types::Timestamp;
use std::sync::Arc;
use tracing::trace;

/// Classifies campaigns against a time source.
pub struct LifecycleService<T: TimeSource> {
    time: Arc<T>,
}

impl<T: TimeSource> LifecycleService<T> {
    pub fn new(time: Arc<T>) -> Self {
        Self { time }
    }
}

impl<T: TimeSource> LifecycleApi for LifecycleService<T> {
    fn classify_at(
        &self,
        now: Timestamp,
        record: &CampaignRecord,
        participation: Option<&ParticipationRecord>,
    ) -> LifecycleState {
        let state = classify(now, record, participation);
        trace!(
            %now,
            state = state.as_str(),
            participant = participation.is_some(),
            "[lp-02] Classified campaign"
        );
        state
    }

    fn classify_now(
        &self,
        record: &CampaignRecord,
        participation: Option<&ParticipationRecord>,
    ) -> LifecycleState {
        self.classify_at(self.time.now(), record, participation)
    }

    fn next_transition(&self, record: &CampaignRecord) -> Option<Timestamp> {
        next_transition_at(self.time.now(), record)
    }
}
