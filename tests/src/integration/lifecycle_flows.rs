//! # Lifecycle Flows
//!
//! A campaign walked from pre-launch to liquidity, re-classified at each
//! instant `next_transition` reports and whenever its records change.

#[cfg(test)]
mod tests {
    use lp_02_lifecycle::{
        CampaignRecord, FixedTimeSource, LifecycleApi, LifecycleService, LifecycleState,
        ParticipationRecord, LIQUIDITY_TIMEOUT,
    };
    use lp_telemetry::{init_telemetry, TelemetryConfig};
    use shared_types::Timestamp;
    use std::sync::Arc;

    const LAUNCH: u64 = 1_700_000_000;
    const END: u64 = LAUNCH + 3 * 24 * 60 * 60;

    fn campaign() -> CampaignRecord {
        CampaignRecord {
            launch_time: Timestamp::from_secs(LAUNCH),
            end_time: Timestamp::from_secs(END),
            units_sold: 0,
            units_offered: 500,
            liquidity_established: false,
        }
    }

    fn service(now: Timestamp) -> (Arc<FixedTimeSource>, LifecycleService<FixedTimeSource>) {
        let time = Arc::new(FixedTimeSource::new(now));
        (Arc::clone(&time), LifecycleService::new(time))
    }

    #[test]
    fn test_successful_campaign_from_participant_view() {
        let (time, lifecycle) = service(Timestamp::from_secs(LAUNCH - 60));
        let mut record = campaign();
        let mut ticket: Option<ParticipationRecord> = None;

        assert_eq!(lifecycle.classify_now(&record, ticket.as_ref()), LifecycleState::PreLaunch);

        // Sales open.
        let next = lifecycle.next_transition(&record).unwrap();
        assert_eq!(next, record.launch_time);
        time.set(next);
        assert_eq!(
            lifecycle.classify_now(&record, ticket.as_ref()),
            LifecycleState::ActiveNoTickets
        );

        // The participant buys three tickets; the campaign sells out.
        ticket = Some(ParticipationRecord {
            claimed_units: 0,
            total_units: 3,
            winning_units: 0,
        });
        record.units_sold = 500;
        assert_eq!(
            lifecycle.classify_now(&record, ticket.as_ref()),
            LifecycleState::ActiveTickets
        );

        // Sales close.
        let next = lifecycle.next_transition(&record).unwrap();
        assert_eq!(next, record.end_time);
        time.set(next);
        assert_eq!(
            lifecycle.classify_now(&record, ticket.as_ref()),
            LifecycleState::MintSucceededTicketsToCheck
        );

        // Every ticket checked, one winner.
        ticket = Some(ParticipationRecord {
            claimed_units: 3,
            total_units: 3,
            winning_units: 1,
        });
        assert_eq!(
            lifecycle.classify_now(&record, ticket.as_ref()),
            LifecycleState::MintSucceededTicketsCheckedNoLp
        );

        // The liquidity window passes without a pool: still NO_LP.
        let next = lifecycle.next_transition(&record).unwrap();
        assert_eq!(next, record.end_time.saturating_add(LIQUIDITY_TIMEOUT));
        time.set(next);
        let state = lifecycle.classify_now(&record, ticket.as_ref());
        assert_eq!(state, LifecycleState::MintSucceededTicketsCheckedNoLp);
        assert!(state.is_terminal_for_participant());

        record.liquidity_established = true;
        assert_eq!(
            lifecycle.classify_now(&record, ticket.as_ref()),
            LifecycleState::MintSucceededTicketsCheckedLp
        );
        assert_eq!(lifecycle.next_transition(&record), None);
    }

    #[test]
    fn test_failed_campaign_viewer_and_participant_disagree() {
        let (_, lifecycle) = service(Timestamp::from_secs(END + 1));
        let record = CampaignRecord {
            units_sold: 120,
            ..campaign()
        };
        let ticket = ParticipationRecord {
            claimed_units: 0,
            total_units: 2,
            winning_units: 0,
        };

        let viewer = lifecycle.classify_now(&record, None);
        let participant = lifecycle.classify_now(&record, Some(&ticket));

        assert_eq!(viewer, LifecycleState::MintFailedRefunded);
        assert_eq!(participant, LifecycleState::MintFailedNotRefunded);
        assert!(!participant.is_terminal_for_participant());
    }

    #[test]
    fn test_states_serialize_with_wire_names() {
        let (_, lifecycle) = service(Timestamp::from_secs(END + 1));
        let record = CampaignRecord {
            units_sold: 500,
            ..campaign()
        };
        let ticket = ParticipationRecord {
            claimed_units: 1,
            total_units: 2,
            winning_units: 0,
        };

        let state = lifecycle.classify_now(&record, Some(&ticket));
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "\"MINT_SUCCEDED_TICKETS_TO_CHECK\"");
    }

    #[test]
    fn test_classification_runs_under_installed_telemetry() {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::for_component("02", "lifecycle")
        };
        // Fails if a global subscriber is already installed.
        let guard = init_telemetry(config).ok();
        if let Some(guard) = &guard {
            assert_eq!(guard.service_name(), "lp-02-lifecycle");
        }

        let (_, lifecycle) = service(Timestamp::from_secs(LAUNCH + 1));
        assert_eq!(
            lifecycle.classify_now(&campaign(), None),
            LifecycleState::ActiveNoTickets
        );
    }
}
