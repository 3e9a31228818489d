//! Error types for the Commit Coordinator
//!
//! Terminal failures of a session (signer rejection, broadcast rejection,
//! on-chain error, timeout) are not errors: they come back as an
//! [`Outcome`](shared_types::Outcome). `CommitError` covers what prevents a
//! session from producing an outcome at all.

use shared_types::{ActionSite, SessionState};
use thiserror::Error;

/// Commit Coordinator errors
#[derive(Debug, Error)]
pub enum CommitError {
    /// The action site already has a live session
    #[error("A submission for {site} is already in flight")]
    ConcurrentSubmissionRejected { site: ActionSite },

    /// A session step was attempted out of order
    #[error("Invalid session transition: cannot go from {from} to {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },

    /// The subscription service refused to register a listener
    #[error("Subscription failed: {reason}")]
    Subscription { reason: String },

    /// Rejected configuration value
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl CommitError {
    /// Whether the caller may simply try again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CommitError::ConcurrentSubmissionRejected { .. })
    }
}

/// Result type for commit operations
pub type CommitResult<T> = Result<T, CommitError>;
