//! # Commit Flows
//!
//! The Commit Coordinator wired to real adapters: confirmation notices arrive
//! through `BusSubscriptionService` and lifecycle events leave through
//! `EventBusOutcomeReporter`, both on the same in-process bus.
//!
//! ```text
//! registry.submit_for ──→ WalletStub ──→ LedgerSimulator ──(delay)──→ bus: OperationNotice
//!        │                                                                   │
//!        └── EventBusOutcomeReporter ──→ bus: Commit events    BusSubscriptionService
//! ```

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{purchase_request, LedgerScript, LedgerSimulator, WalletStub};
    use lp_01_commit_coordinator::adapters::{
        BusSubscriptionService, EventBusOutcomeReporter, TokioClock,
    };
    use lp_01_commit_coordinator::{CommitConfig, CommitError, CoordinatorRegistry};
    use shared_bus::{EventFilter, InMemoryEventBus, LedgerEvent, Subscription};
    use shared_types::{
        ActionSite, CommitEvent, CommitLevel, FailureReason, OperationReference, Outcome,
        SessionState, Timestamp,
    };
    use std::sync::atomic::Ordering;
    use std::sync::Arc;
    use std::time::Duration;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    type Registry = CoordinatorRegistry<WalletStub, LedgerSimulator, BusSubscriptionService, TokioClock>;

    struct Stack {
        bus: Arc<InMemoryEventBus>,
        wallet: Arc<WalletStub>,
        ledger: Arc<LedgerSimulator>,
        feed: Arc<BusSubscriptionService>,
        registry: Arc<Registry>,
    }

    fn stack(script: LedgerScript) -> Stack {
        stack_with(CommitConfig::default(), script)
    }

    fn stack_with(config: CommitConfig, script: LedgerScript) -> Stack {
        let bus = Arc::new(InMemoryEventBus::new());
        let wallet = Arc::new(WalletStub::new());
        let ledger = Arc::new(LedgerSimulator::new(Arc::clone(&bus), script));
        let feed = Arc::new(BusSubscriptionService::new(Arc::clone(&bus)));
        let registry = CoordinatorRegistry::new(
            config,
            Arc::clone(&wallet),
            Arc::clone(&ledger),
            Arc::clone(&feed),
            Arc::new(TokioClock::anchored_at(Timestamp::from_secs(1_700_000_000))),
        )
        .unwrap()
        .with_reporter(Arc::new(EventBusOutcomeReporter::new(Arc::clone(&bus))));

        Stack {
            bus,
            wallet,
            ledger,
            feed,
            registry: Arc::new(registry),
        }
    }

    fn drain(subscription: &mut Subscription) -> Vec<CommitEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = subscription.try_recv() {
            if let LedgerEvent::Commit(event) = event {
                events.push(event);
            }
        }
        events
    }

    fn states(events: &[CommitEvent]) -> Vec<SessionState> {
        events.iter().map(|e| e.state).collect()
    }

    fn confirm_after(secs: u64) -> LedgerScript {
        LedgerScript::Confirm {
            delay: Duration::from_secs(secs),
            level: CommitLevel::Confirmed,
        }
    }

    // =============================================================================
    // INTEGRATION TESTS: SUBMIT → BUS
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_purchase_confirms_through_bus() {
        let s = stack(confirm_after(2));
        let mut commits = s
            .bus
            .subscribe(EventFilter::commits_from(vec![ActionSite::TicketPurchase]));

        let outcome = s
            .registry
            .submit_for(ActionSite::TicketPurchase, purchase_request())
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Confirmed(OperationReference::new("op-0")));

        let events = drain(&mut commits);
        assert_eq!(
            states(&events),
            vec![
                SessionState::Signing,
                SessionState::Broadcasting,
                SessionState::AwaitingConfirmation,
                SessionState::Confirmed,
            ]
        );
        assert!(events.iter().all(|e| e.session_id == events[0].session_id));
        assert_eq!(events[3].outcome, Some(outcome));
        assert!(events[..3].iter().all(|e| e.outcome.is_none()));
        assert_eq!(s.feed.active_listeners(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_chain_error_fails_session() {
        let s = stack(LedgerScript::FailOnChain {
            delay: Duration::from_secs(1),
            error: "insufficient funds for ticket",
        });

        let outcome = s
            .registry
            .submit_for(ActionSite::TicketPurchase, purchase_request())
            .await
            .unwrap();

        match &outcome {
            Outcome::Failed(FailureReason::ConfirmationError { reference, error }) => {
                assert_eq!(reference.as_str(), "op-0");
                assert_eq!(error, "insufficient funds for ticket");
            }
            other => panic!("expected ConfirmationError, got {:?}", other),
        }
        assert!(outcome.user_message().contains("insufficient funds"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refused_broadcast_never_waits() {
        let s = stack(LedgerScript::Refuse("blockhash not found"));
        let mut commits = s.bus.subscribe(EventFilter::all());

        let outcome = s
            .registry
            .submit_for(ActionSite::AmmInit, purchase_request())
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            Outcome::Failed(FailureReason::BroadcastRejected(_))
        ));
        assert_eq!(
            states(&drain(&mut commits)),
            vec![
                SessionState::Signing,
                SessionState::Broadcasting,
                SessionState::Failed
            ]
        );
        assert_eq!(s.feed.active_listeners(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_notice_after_timeout_is_ignored() {
        let mut config = CommitConfig::default();
        config
            .site_timeouts
            .insert(ActionSite::TicketCheck, Duration::from_secs(20));
        let s = stack_with(config, confirm_after(25));
        let mut commits = s
            .bus
            .subscribe(EventFilter::commits_from(vec![ActionSite::TicketCheck]));

        let outcome = s
            .registry
            .submit_for(ActionSite::TicketCheck, purchase_request())
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::TimedOut(OperationReference::new("op-0")));
        assert!(!outcome.is_definitive());
        assert_eq!(s.feed.active_listeners(), 0);

        // Let the ledger's late notice land.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(s.ledger.notices_published.load(Ordering::SeqCst), 1);

        let events = drain(&mut commits);
        assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
        assert_eq!(events.last().map(|e| e.state), Some(SessionState::TimedOut));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hype_vote_times_out_before_default_sites() {
        let s = stack(confirm_after(15));

        let vote = s
            .registry
            .submit_for(ActionSite::HypeVote, purchase_request())
            .await
            .unwrap();
        let edit = s
            .registry
            .submit_for(ActionSite::UsernameEdit, purchase_request())
            .await
            .unwrap();

        assert!(matches!(vote, Outcome::TimedOut(_)));
        assert!(matches!(edit, Outcome::Confirmed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_below_requested_level_is_not_enough() {
        let s = stack(LedgerScript::Confirm {
            delay: Duration::from_secs(1),
            level: CommitLevel::Processed,
        });
        let coordinator = s.registry.coordinator(ActionSite::CollectionEdit);

        let outcome = coordinator
            .submit(
                purchase_request(),
                CommitLevel::Finalized,
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::TimedOut(_)));
        assert_eq!(s.ledger.notices_published.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_submit_rejected_then_retry_accepted() {
        let s = stack(LedgerScript::Silent);

        let first = {
            let registry = Arc::clone(&s.registry);
            tokio::spawn(async move {
                registry
                    .submit_for(ActionSite::TicketPurchase, purchase_request())
                    .await
            })
        };
        while s.ledger.sent.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        let second = s
            .registry
            .submit_for(ActionSite::TicketPurchase, purchase_request())
            .await;
        assert!(matches!(
            second,
            Err(CommitError::ConcurrentSubmissionRejected {
                site: ActionSite::TicketPurchase
            })
        ));
        assert_eq!(s.wallet.signed.load(Ordering::SeqCst), 1);
        assert_eq!(s.ledger.sent.load(Ordering::SeqCst), 1);

        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, Outcome::TimedOut(_)));

        let retry = s
            .registry
            .submit_for(ActionSite::TicketPurchase, purchase_request())
            .await
            .unwrap();
        assert_eq!(retry, Outcome::TimedOut(OperationReference::new("op-1")));
        assert_eq!(s.wallet.signed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sites_confirm_concurrently() {
        let s = stack(confirm_after(3));
        let mut commits = s.bus.subscribe(EventFilter::commits_from(vec![
            ActionSite::AmmInit,
            ActionSite::CollectionEdit,
        ]));

        let amm = s.registry.submit_for(ActionSite::AmmInit, purchase_request());
        let collection = s
            .registry
            .submit_for(ActionSite::CollectionEdit, purchase_request());
        let (amm, collection) = tokio::join!(amm, collection);

        let amm = amm.unwrap();
        let collection = collection.unwrap();
        assert!(matches!(amm, Outcome::Confirmed(_)));
        assert!(matches!(collection, Outcome::Confirmed(_)));
        assert_ne!(amm.reference(), collection.reference());

        let terminal: Vec<ActionSite> = drain(&mut commits)
            .into_iter()
            .filter(CommitEvent::is_terminal)
            .map(|e| e.site)
            .collect();
        assert_eq!(terminal.len(), 2);
        assert!(terminal.contains(&ActionSite::AmmInit));
        assert!(terminal.contains(&ActionSite::CollectionEdit));
        assert!(s.registry.busy_sites().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_show_up_in_metrics() {
        let s = stack(confirm_after(1));
        s.registry
            .submit_for(ActionSite::TicketCheck, purchase_request())
            .await
            .unwrap();

        let exposition = lp_telemetry::encode_metrics().unwrap();
        assert!(exposition.contains("commit_outcomes_total"));
        assert!(exposition.contains("ticket_check"));
    }
}
