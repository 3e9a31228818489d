//! Test fixtures: a wallet that always signs and a ledger that answers
//! broadcasts by publishing confirmation notices on the bus.

use async_trait::async_trait;
use lp_01_commit_coordinator::ports::{
    BroadcastError, BroadcastResponse, Broadcaster, Signer, SignerError,
};
use shared_bus::{EventPublisher, InMemoryEventBus, LedgerEvent};
use shared_types::{
    AccountMeta, CommitLevel, ConfirmationNotice, EncodedOperation, OperationReference,
    OperationRequest, OperationSignature, PublicKey, SignedOperation,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const PAYER: PublicKey = [0x11; 32];

/// A request paid for and signed by [`PAYER`].
pub fn purchase_request() -> OperationRequest {
    OperationRequest::new(
        b"buy_tickets:3".to_vec(),
        vec![AccountMeta::writable(PAYER, true)],
        PAYER,
    )
}

/// Wallet that signs every request with the fee payer's key.
pub struct WalletStub {
    pub signed: AtomicUsize,
}

impl WalletStub {
    pub fn new() -> Self {
        Self {
            signed: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Signer for WalletStub {
    async fn sign(&self, request: OperationRequest) -> Result<SignedOperation, SignerError> {
        self.signed.fetch_add(1, Ordering::SeqCst);
        let signature = OperationSignature {
            signer: *request.fee_payer(),
            signature: [0x5a; 64],
        };
        Ok(SignedOperation::new(request, vec![signature]))
    }
}

/// How the simulated ledger treats a broadcast.
#[derive(Debug, Clone)]
pub enum LedgerScript {
    /// Accept, then publish a success notice at `level` after `delay`.
    Confirm { delay: Duration, level: CommitLevel },
    /// Accept, then publish an execution error after `delay`.
    FailOnChain { delay: Duration, error: &'static str },
    /// Accept and never publish anything.
    Silent,
    /// Refuse the broadcast.
    Refuse(&'static str),
}

/// Broadcaster that plays the ledger: every accepted operation gets a fresh
/// reference and, depending on the script, a notice on the bus.
pub struct LedgerSimulator {
    bus: Arc<InMemoryEventBus>,
    script: LedgerScript,
    pub sent: AtomicUsize,
    /// Notices actually published, including ones nobody was waiting for.
    pub notices_published: Arc<AtomicUsize>,
}

impl LedgerSimulator {
    pub fn new(bus: Arc<InMemoryEventBus>, script: LedgerScript) -> Self {
        Self {
            bus,
            script,
            sent: AtomicUsize::new(0),
            notices_published: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl Broadcaster for LedgerSimulator {
    async fn send(&self, operation: EncodedOperation) -> Result<BroadcastResponse, BroadcastError> {
        let decoded = operation
            .decode()
            .map_err(|e| BroadcastError::Rpc { code: -32602, message: e.to_string() })?;
        if !decoded.is_signed_by_fee_payer() {
            return Ok(BroadcastResponse::Rejected("missing fee payer signature".into()));
        }

        let n = self.sent.fetch_add(1, Ordering::SeqCst);
        let reference = OperationReference::new(format!("op-{}", n));

        let notice = match &self.script {
            LedgerScript::Refuse(reason) => {
                return Ok(BroadcastResponse::Rejected((*reason).to_string()))
            }
            LedgerScript::Silent => None,
            LedgerScript::Confirm { delay, level } => Some((
                *delay,
                ConfirmationNotice::success(reference.clone(), *level),
            )),
            LedgerScript::FailOnChain { delay, error } => Some((
                *delay,
                ConfirmationNotice::failure(reference.clone(), CommitLevel::Confirmed, *error),
            )),
        };

        if let Some((delay, notice)) = notice {
            let bus = Arc::clone(&self.bus);
            let published = Arc::clone(&self.notices_published);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                bus.publish(LedgerEvent::OperationNotice(notice)).await;
                published.fetch_add(1, Ordering::SeqCst);
            });
        }

        Ok(BroadcastResponse::Accepted(reference))
    }
}
