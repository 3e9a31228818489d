//! Commit session state machine
//!
//! ```text
//! [Idle] ──→ [Signing] ──→ [Broadcasting] ──→ [AwaitingConfirmation] ──┬──→ [Confirmed]
//!                │               │                                      ├──→ [Failed]
//!                └──→ [Failed]   └──→ [Failed]                          └──→ [TimedOut]
//! ```
//!
//! A session is created by one `submit`, moves strictly forward and is
//! dropped once terminal. The first terminal transition produces the
//! session's only terminal event; later attempts produce nothing.

use crate::error::{CommitError, CommitResult};
use shared_types::{
    ActionSite, CommitEvent, OperationReference, Outcome, SessionId, SessionState, Timestamp,
};
use uuid::Uuid;

/// One in-flight commit attempt.
#[derive(Debug)]
pub struct CommitSession {
    id: SessionId,
    site: ActionSite,
    state: SessionState,
    reference: Option<OperationReference>,
    deadline: Option<Timestamp>,
    outcome: Option<Outcome>,
}

impl CommitSession {
    pub fn new(site: ActionSite) -> Self {
        Self {
            id: Uuid::new_v4(),
            site,
            state: SessionState::Idle,
            reference: None,
            deadline: None,
            outcome: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn site(&self) -> ActionSite {
        self.site
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Set once the broadcast is accepted.
    pub fn reference(&self) -> Option<&OperationReference> {
        self.reference.as_ref()
    }

    /// Confirmation deadline, set on entering `AwaitingConfirmation`.
    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Advance to a non-terminal state and return its event.
    ///
    /// Terminal states go through [`finish`](Self::finish), and
    /// `AwaitingConfirmation` through
    /// [`await_confirmation`](Self::await_confirmation).
    pub fn advance(&mut self, next: SessionState, at: Timestamp) -> CommitResult<CommitEvent> {
        if next.is_terminal() || next == SessionState::AwaitingConfirmation {
            return Err(self.invalid(next));
        }
        self.step(next)?;
        Ok(self.event(at))
    }

    /// Record the accepted reference and the deadline, entering
    /// `AwaitingConfirmation`.
    pub fn await_confirmation(
        &mut self,
        reference: OperationReference,
        deadline: Timestamp,
        at: Timestamp,
    ) -> CommitResult<CommitEvent> {
        self.step(SessionState::AwaitingConfirmation)?;
        self.reference = Some(reference);
        self.deadline = Some(deadline);
        Ok(self.event(at))
    }

    /// Enter the terminal state matching `outcome`.
    ///
    /// Returns the terminal event the first time, `Ok(None)` on any later
    /// call. A terminal state not reachable from the current one is an
    /// error.
    pub fn finish(&mut self, outcome: Outcome, at: Timestamp) -> CommitResult<Option<CommitEvent>> {
        if self.state.is_terminal() {
            return Ok(None);
        }
        self.step(outcome.state())?;
        self.outcome = Some(outcome);
        Ok(Some(self.event(at)))
    }

    fn step(&mut self, next: SessionState) -> CommitResult<()> {
        if !self.state.can_transition_to(next) {
            return Err(self.invalid(next));
        }
        self.state = next;
        Ok(())
    }

    fn invalid(&self, to: SessionState) -> CommitError {
        CommitError::InvalidTransition {
            from: self.state,
            to,
        }
    }

    fn event(&self, at: Timestamp) -> CommitEvent {
        CommitEvent {
            session_id: self.id,
            site: self.site,
            state: self.state,
            reference: self.reference.clone(),
            outcome: self.outcome.clone(),
            at,
        }
    }
}
