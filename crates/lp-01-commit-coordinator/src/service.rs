//! Commit Coordinator - core orchestration
//!
//! One coordinator serves one action site. Each `submit` runs a short-lived
//! session: occupy the site's slot, sign, broadcast, then race the
//! confirmation watcher against the deadline.

use crate::adapters::NoopOutcomeReporter;
use crate::domain::{
    CommitSession, ConfirmationWatcher, Deadline, PendingConfirmation, SingleFlightSlot,
    SlotGuard, TimeoutGovernor,
};
use crate::error::{CommitError, CommitResult};
use crate::metrics;
use crate::ports::inbound::CommitApi;
use crate::ports::outbound::{
    BroadcastResponse, Broadcaster, Clock, OutcomeReporter, Signer, SubscriptionService,
};
use async_trait::async_trait;
use shared_types::{
    ActionSite, CommitLevel, ConfirmationNotice, FailureReason, OperationReference,
    OperationRequest, Outcome, SessionState, SignedOperation, Timestamp,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sign → broadcast → confirm orchestration for one action site.
pub struct CommitCoordinator<S, B, N, C>
where
    S: Signer,
    B: Broadcaster,
    N: SubscriptionService,
    C: Clock,
{
    site: ActionSite,
    signer: Arc<S>,
    broadcaster: Arc<B>,
    watcher: ConfirmationWatcher<N>,
    governor: TimeoutGovernor<C>,
    clock: Arc<C>,
    reporter: Arc<dyn OutcomeReporter>,
    slot: SingleFlightSlot,
    signer_timeout: Option<Duration>,
}

impl<S, B, N, C> CommitCoordinator<S, B, N, C>
where
    S: Signer,
    B: Broadcaster,
    N: SubscriptionService,
    C: Clock,
{
    /// Create a coordinator with an unbounded signer and no reporter.
    pub fn new(
        site: ActionSite,
        signer: Arc<S>,
        broadcaster: Arc<B>,
        subscriptions: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            site,
            signer,
            broadcaster,
            watcher: ConfirmationWatcher::new(subscriptions),
            governor: TimeoutGovernor::new(Arc::clone(&clock)),
            clock,
            reporter: Arc::new(NoopOutcomeReporter),
            slot: SingleFlightSlot::new(site),
            signer_timeout: None,
        }
    }

    /// Send lifecycle events to `reporter`.
    pub fn with_reporter(mut self, reporter: Arc<dyn OutcomeReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Bound the signing step. `None` waits for the signer indefinitely.
    pub fn with_signer_timeout(mut self, signer_timeout: Option<Duration>) -> Self {
        self.signer_timeout = signer_timeout;
        self
    }

    pub fn site(&self) -> ActionSite {
        self.site
    }

    /// Whether a session currently holds the slot.
    pub fn is_busy(&self) -> bool {
        !self.slot.is_empty()
    }

    /// Run one commit session to its terminal outcome.
    ///
    /// `Err` is returned only when the session could not run at all; every
    /// session that started ends in exactly one `Outcome`.
    pub async fn submit(
        &self,
        request: OperationRequest,
        level: CommitLevel,
        timeout: Duration,
    ) -> CommitResult<Outcome> {
        let mut session = CommitSession::new(self.site);
        let Some(slot) = self.slot.try_occupy(session.id()) else {
            metrics::record_concurrent_rejection(self.site);
            warn!(site = %self.site, "[lp-01] ⛔ Submission rejected: site already has a live session");
            return Err(CommitError::ConcurrentSubmissionRejected { site: self.site });
        };
        let session_id = session.id();
        info!(
            %session_id,
            site = %self.site,
            level = %level,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "[lp-01] Commit session started"
        );

        // Stage 1: signing
        let event = session.advance(SessionState::Signing, self.clock.now())?;
        self.reporter.report(event).await;
        let signed = match self.sign(request).await {
            Ok(signed) => signed,
            Err(reason) => {
                return self
                    .finish(&mut session, slot, Outcome::Failed(reason), None)
                    .await
            }
        };

        // Stage 2: broadcasting
        let event = session.advance(SessionState::Broadcasting, self.clock.now())?;
        self.reporter.report(event).await;
        let reference = match self.broadcast(&signed).await {
            Ok(reference) => reference,
            Err(reason) => {
                return self
                    .finish(&mut session, slot, Outcome::Failed(reason), None)
                    .await
            }
        };

        // Stage 3: watcher and deadline start together
        let deadline = self.governor.arm(timeout);
        let pending = match self.watcher.watch(&reference, level) {
            Ok(pending) => Some(pending),
            Err(e) => {
                warn!(
                    %session_id,
                    %reference,
                    error = %e,
                    "[lp-01] Could not watch for confirmation; waiting for the deadline"
                );
                None
            }
        };
        let event =
            session.await_confirmation(reference.clone(), deadline.expires_at(), self.clock.now())?;
        let awaiting_since = event.at;
        self.reporter.report(event).await;
        debug!(%session_id, %reference, deadline = %deadline.expires_at(), "[lp-01] Awaiting confirmation");

        let outcome = Self::race(reference, pending, deadline).await;
        self.finish(&mut session, slot, outcome, Some(awaiting_since))
            .await
    }

    async fn sign(&self, request: OperationRequest) -> Result<SignedOperation, FailureReason> {
        let signing = self.signer.sign(request);
        let result = match self.signer_timeout {
            None => signing.await,
            Some(bound) => {
                let mut deadline = self.governor.arm(bound);
                tokio::select! {
                    biased;
                    result = signing => {
                        deadline.cancel();
                        result
                    }
                    _ = &mut deadline => {
                        warn!(site = %self.site, bound_ms = u64::try_from(bound.as_millis()).unwrap_or(u64::MAX), "[lp-01] Signer did not answer in time");
                        return Err(FailureReason::SignerTimeout);
                    }
                }
            }
        };
        result.map_err(|e| FailureReason::UserRejected(e.to_string()))
    }

    async fn broadcast(
        &self,
        signed: &SignedOperation,
    ) -> Result<OperationReference, FailureReason> {
        let encoded = signed
            .encode()
            .map_err(|e| FailureReason::BroadcastRejected(e.to_string()))?;

        match self.broadcaster.send(encoded).await {
            Ok(BroadcastResponse::Accepted(reference)) => Ok(reference),
            Ok(BroadcastResponse::Rejected(reason)) => Err(FailureReason::BroadcastRejected(reason)),
            Err(e) => Err(FailureReason::BroadcastRejected(e.to_string())),
        }
    }

    /// First to settle wins; the loser is cancelled.
    ///
    /// On a tie the notice wins.
    async fn race(
        reference: OperationReference,
        pending: Option<PendingConfirmation<N>>,
        mut deadline: Deadline,
    ) -> Outcome {
        let Some(mut pending) = pending else {
            (&mut deadline).await;
            return Outcome::TimedOut(reference);
        };

        let outcome = tokio::select! {
            biased;
            notice = &mut pending => outcome_from_notice(notice),
            _ = &mut deadline => Outcome::TimedOut(reference),
        };

        pending.cancel();
        deadline.cancel();
        outcome
    }

    async fn finish(
        &self,
        session: &mut CommitSession,
        slot: SlotGuard,
        outcome: Outcome,
        awaiting_since: Option<Timestamp>,
    ) -> CommitResult<Outcome> {
        let now = self.clock.now();
        let terminal = session.finish(outcome.clone(), now)?;
        // Release before reporting so listeners reacting to the terminal
        // event can submit again.
        drop(slot);

        if let Some(event) = terminal {
            self.reporter.report(event).await;
        }

        metrics::record_outcome(self.site, &outcome);
        if let Some(since) = awaiting_since {
            metrics::record_confirmation_latency(self.site, now.saturating_duration_since(since));
        }

        let session_id = session.id();
        match &outcome {
            Outcome::Confirmed(reference) => {
                info!(%session_id, site = %self.site, %reference, "[lp-01] ✅ Operation confirmed");
            }
            Outcome::Failed(reason) => {
                warn!(%session_id, site = %self.site, reason = reason.label(), detail = %reason, "[lp-01] ❌ Commit session failed");
            }
            Outcome::TimedOut(reference) => {
                warn!(%session_id, site = %self.site, %reference, "[lp-01] ⏱️ No confirmation before deadline; outcome unknown");
            }
        }

        Ok(outcome)
    }
}

fn outcome_from_notice(notice: ConfirmationNotice) -> Outcome {
    match notice.error {
        Some(error) => Outcome::Failed(FailureReason::ConfirmationError {
            reference: notice.reference,
            error,
        }),
        None => Outcome::Confirmed(notice.reference),
    }
}

#[async_trait]
impl<S, B, N, C> CommitApi for CommitCoordinator<S, B, N, C>
where
    S: Signer + 'static,
    B: Broadcaster + 'static,
    N: SubscriptionService + 'static,
    C: Clock + 'static,
{
    async fn submit(
        &self,
        request: OperationRequest,
        level: CommitLevel,
        timeout: Duration,
    ) -> CommitResult<Outcome> {
        CommitCoordinator::submit(self, request, level, timeout).await
    }

    fn site(&self) -> ActionSite {
        self.site
    }

    fn is_busy(&self) -> bool {
        CommitCoordinator::is_busy(self)
    }
}
