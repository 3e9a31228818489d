//! Classification rules
//!
//! Rules are evaluated in a fixed priority order and the first match wins.
//! `PreLaunch` is the fallback when nothing else matches.

use super::record::{CampaignRecord, ParticipationRecord};
use super::state::LifecycleState;
use shared_types::Timestamp;
use std::time::Duration;

/// How long after `end_time` a fully checked campaign without liquidity
/// counts as timed out.
pub const LIQUIDITY_TIMEOUT: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Classify a campaign at `now`, optionally from a participant's point of view.
///
/// Total over every input. Does no I/O and keeps no state.
pub fn classify(
    now: Timestamp,
    record: &CampaignRecord,
    participation: Option<&ParticipationRecord>,
) -> LifecycleState {
    let active = record.launch_time <= now && now < record.end_time;
    let ended = now >= record.end_time;
    let mint_failed = ended && !record.sold_out();
    let mint_succeeded = ended && record.sold_out();

    if active {
        return match participation {
            None => LifecycleState::ActiveNoTickets,
            Some(_) => LifecycleState::ActiveTickets,
        };
    }

    if mint_failed {
        return match participation {
            None => LifecycleState::MintFailedRefunded,
            Some(_) => LifecycleState::MintFailedNotRefunded,
        };
    }

    if mint_succeeded {
        let Some(participation) = participation else {
            return LifecycleState::MintSucceededNoTickets;
        };
        if participation.has_unchecked() {
            return LifecycleState::MintSucceededTicketsToCheck;
        }
        if record.liquidity_established {
            return LifecycleState::MintSucceededTicketsCheckedLp;
        }
        if !record.liquidity_established {
            return LifecycleState::MintSucceededTicketsCheckedNoLp;
        }
        // Shadowed by the branch above; kept so the rule order stays intact.
        if now >= record.end_time.saturating_add(LIQUIDITY_TIMEOUT) {
            return LifecycleState::MintSucceededTicketsCheckedLpTimeout;
        }
    }

    LifecycleState::PreLaunch
}

/// Next instant after `now` at which the classification boundaries move:
/// launch, end, or end plus [`LIQUIDITY_TIMEOUT`].
///
/// `None` once every boundary has passed. Callers that want live status
/// re-classify at this instant or when the record changes.
pub fn next_transition_at(now: Timestamp, record: &CampaignRecord) -> Option<Timestamp> {
    [
        record.launch_time,
        record.end_time,
        record.end_time.saturating_add(LIQUIDITY_TIMEOUT),
    ]
    .into_iter()
    .filter(|boundary| *boundary > now)
    .min()
}
