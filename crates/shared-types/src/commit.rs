//! # Commit Vocabulary
//!
//! Session states, terminal outcomes and lifecycle events shared by the
//! commit coordinator, the event bus and whatever presents outcomes to users.
//!
//! ## Session State Machine
//!
//! ```text
//! [Idle] ──→ [Signing] ──→ [Broadcasting] ──→ [AwaitingConfirmation] ──┬──→ [Confirmed]
//!                │               │                                      ├──→ [Failed]
//!                └──→ [Failed]   └──→ [Failed]                          └──→ [TimedOut]
//! ```

use crate::entities::{OperationReference, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of one commit session.
pub type SessionId = Uuid;

/// A place in the application that submits operations.
///
/// Each site owns exactly one single-flight slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSite {
    TicketPurchase,
    TicketCheck,
    AmmInit,
    UsernameEdit,
    CollectionEdit,
    HypeVote,
}

impl ActionSite {
    /// Every site, in declaration order.
    pub const ALL: [ActionSite; 6] = [
        ActionSite::TicketPurchase,
        ActionSite::TicketCheck,
        ActionSite::AmmInit,
        ActionSite::UsernameEdit,
        ActionSite::CollectionEdit,
        ActionSite::HypeVote,
    ];

    /// Snake-case label used in logs, metrics and config keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionSite::TicketPurchase => "ticket_purchase",
            ActionSite::TicketCheck => "ticket_check",
            ActionSite::AmmInit => "amm_init",
            ActionSite::UsernameEdit => "username_edit",
            ActionSite::CollectionEdit => "collection_edit",
            ActionSite::HypeVote => "hype_vote",
        }
    }
}

impl fmt::Display for ActionSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of a commit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Signing,
    Broadcasting,
    AwaitingConfirmation,
    Confirmed,
    Failed,
    TimedOut,
}

impl SessionState {
    /// Position along the single allowed path; terminal states share a rank.
    pub fn rank(&self) -> u8 {
        match self {
            SessionState::Idle => 0,
            SessionState::Signing => 1,
            SessionState::Broadcasting => 2,
            SessionState::AwaitingConfirmation => 3,
            SessionState::Confirmed | SessionState::Failed | SessionState::TimedOut => 4,
        }
    }

    /// Whether no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Confirmed | SessionState::Failed | SessionState::TimedOut
        )
    }

    /// Whether `self → next` is a legal step.
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Idle, Signing)
                | (Signing, Broadcasting)
                | (Signing, Failed)
                | (Broadcasting, AwaitingConfirmation)
                | (Broadcasting, Failed)
                | (AwaitingConfirmation, Confirmed)
                | (AwaitingConfirmation, Failed)
                | (AwaitingConfirmation, TimedOut)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Why a session ended in `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The signer declined or errored.
    UserRejected(String),
    /// The network refused or errored on send.
    BroadcastRejected(String),
    /// The operation executed on-chain and failed.
    ConfirmationError {
        reference: OperationReference,
        error: String,
    },
    /// The signer did not answer within the configured bound.
    SignerTimeout,
}

impl FailureReason {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            FailureReason::UserRejected(_) => "user_rejected",
            FailureReason::BroadcastRejected(_) => "broadcast_rejected",
            FailureReason::ConfirmationError { .. } => "confirmation_error",
            FailureReason::SignerTimeout => "signer_timeout",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::UserRejected(detail) => write!(f, "signer rejected: {}", detail),
            FailureReason::BroadcastRejected(detail) => write!(f, "broadcast rejected: {}", detail),
            FailureReason::ConfirmationError { reference, error } => {
                write!(f, "operation {} failed on-chain: {}", reference, error)
            }
            FailureReason::SignerTimeout => f.write_str("signer did not respond in time"),
        }
    }
}

/// Terminal result of one `submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Reached the requested commitment level without error.
    Confirmed(OperationReference),
    /// Ended in failure; see the reason.
    Failed(FailureReason),
    /// No notification before the deadline. The operation may still land.
    TimedOut(OperationReference),
}

impl Outcome {
    /// The session state this outcome corresponds to.
    pub fn state(&self) -> SessionState {
        match self {
            Outcome::Confirmed(_) => SessionState::Confirmed,
            Outcome::Failed(_) => SessionState::Failed,
            Outcome::TimedOut(_) => SessionState::TimedOut,
        }
    }

    /// Label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Confirmed(_) => "confirmed",
            Outcome::Failed(reason) => reason.label(),
            Outcome::TimedOut(_) => "timed_out",
        }
    }

    /// The operation reference, when the operation was broadcast.
    pub fn reference(&self) -> Option<&OperationReference> {
        match self {
            Outcome::Confirmed(reference) | Outcome::TimedOut(reference) => Some(reference),
            Outcome::Failed(FailureReason::ConfirmationError { reference, .. }) => Some(reference),
            Outcome::Failed(_) => None,
        }
    }

    /// False for `TimedOut`: the operation's fate is unknown.
    pub fn is_definitive(&self) -> bool {
        !matches!(self, Outcome::TimedOut(_))
    }

    /// The single message shown to the user for this outcome.
    pub fn user_message(&self) -> String {
        match self {
            Outcome::Confirmed(_) => "Transaction confirmed.".to_string(),
            Outcome::Failed(FailureReason::UserRejected(_)) => {
                "Transaction was not signed.".to_string()
            }
            Outcome::Failed(FailureReason::BroadcastRejected(_)) => {
                "Transaction could not be sent. Please try again.".to_string()
            }
            Outcome::Failed(FailureReason::ConfirmationError { error, .. }) => {
                format!("Transaction failed: {}", error)
            }
            Outcome::Failed(FailureReason::SignerTimeout) => {
                "Wallet did not respond. Please try again.".to_string()
            }
            Outcome::TimedOut(reference) => format!(
                "Transaction {} was not confirmed in time. Check its status before retrying.",
                reference
            ),
        }
    }
}

/// A lifecycle event emitted by a commit session.
///
/// A session emits, in order: `Signing`, `Broadcasting` (if signing
/// succeeded), `AwaitingConfirmation` (if broadcast succeeded) and exactly one
/// terminal event carrying the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEvent {
    /// Session that produced the event.
    pub session_id: SessionId,
    /// Action site of the session.
    pub site: ActionSite,
    /// State entered.
    pub state: SessionState,
    /// Reference, once broadcast succeeded.
    pub reference: Option<OperationReference>,
    /// Present on the terminal event only.
    pub outcome: Option<Outcome>,
    /// When the state was entered.
    pub at: Timestamp,
}

impl CommitEvent {
    /// Whether this is the session's terminal event.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}
