//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Everything the coordinator needs from the outside world: a wallet to
//! sign, an RPC node to broadcast to, a notification feed, a clock and a
//! sink for lifecycle events.

use async_trait::async_trait;
use futures::future::BoxFuture;
use shared_types::{
    CommitEvent, CommitLevel, ConfirmationNotice, EncodedOperation, OperationReference,
    OperationRequest, SignedOperation, Timestamp,
};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// SIGNER
// =============================================================================

/// Why the signer produced no signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    /// The user declined in the wallet.
    #[error("user declined: {0}")]
    Rejected(String),
    /// No wallet connected, or the wallet errored.
    #[error("signer unavailable: {0}")]
    Unavailable(String),
}

/// Wallet interface.
///
/// May suspend for as long as the user takes to approve.
#[async_trait]
pub trait Signer: Send + Sync {
    /// Produce a signed operation for the request's fee payer.
    async fn sign(&self, request: OperationRequest) -> Result<SignedOperation, SignerError>;
}

// =============================================================================
// BROADCASTER
// =============================================================================

/// Node answer to a broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastResponse {
    /// Accepted for processing; this is the reference to watch.
    Accepted(OperationReference),
    /// Explicitly refused (preflight failure, blockhash expired, ...).
    Rejected(String),
}

/// Transport-level broadcast failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BroadcastError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
}

/// RPC node interface for sending encoded operations.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Send an encoded signed operation.
    async fn send(&self, operation: EncodedOperation)
        -> Result<BroadcastResponse, BroadcastError>;
}

// =============================================================================
// SUBSCRIPTION SERVICE
// =============================================================================

/// Callback invoked at most once with the notice for a subscription.
pub type NotificationCallback = Box<dyn FnOnce(ConfirmationNotice) + Send + 'static>;

/// Opaque handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(pub u64);

/// Listener registration refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("subscription refused: {0}")]
pub struct SubscriptionFailure(pub String);

/// Ledger notification feed.
///
/// Implementations invoke the callback at most once. A feed that drops the
/// connection never invokes it.
pub trait SubscriptionService: Send + Sync {
    /// Register a listener for `reference` reaching `level`.
    fn on_notification(
        &self,
        reference: &OperationReference,
        level: CommitLevel,
        callback: NotificationCallback,
    ) -> Result<SubscriptionHandle, SubscriptionFailure>;

    /// Remove a listener. Unknown or already-removed handles are ignored.
    fn cancel(&self, handle: SubscriptionHandle);
}

// =============================================================================
// CLOCK
// =============================================================================

/// Marker produced when a timer elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed;

/// Time source and timer factory.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> Timestamp;

    /// Future that completes once `duration` has passed since this call,
    /// however late it is first polled.
    ///
    /// Dropping the future discards the timer.
    fn after(&self, duration: Duration) -> BoxFuture<'static, Elapsed>;
}

// =============================================================================
// OUTCOME REPORTER
// =============================================================================

/// Sink for session lifecycle events, in order.
#[async_trait]
pub trait OutcomeReporter: Send + Sync {
    async fn report(&self, event: CommitEvent);
}
