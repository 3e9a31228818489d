//! Driving Ports (API - Inbound)

use crate::domain::{CampaignRecord, LifecycleState, ParticipationRecord};
use shared_types::Timestamp;

/// Primary Lifecycle API
///
/// Classification is synchronous and never cached; call again whenever the
/// record changes or [`next_transition`](LifecycleApi::next_transition)
/// passes.
pub trait LifecycleApi: Send + Sync {
    /// Classify at an explicit instant.
    fn classify_at(
        &self,
        now: Timestamp,
        record: &CampaignRecord,
        participation: Option<&ParticipationRecord>,
    ) -> LifecycleState;

    /// Classify at the time source's current instant.
    fn classify_now(
        &self,
        record: &CampaignRecord,
        participation: Option<&ParticipationRecord>,
    ) -> LifecycleState;

    /// When a pure passage of time could next change the result.
    fn next_transition(&self, record: &CampaignRecord) -> Option<Timestamp>;
}
