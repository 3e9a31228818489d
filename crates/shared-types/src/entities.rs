//! # Core Ledger Entities
//!
//! Defines the ledger-facing entities every launchpad action works with.
//!
//! ## Clusters
//!
//! - **Operation**: `AccountMeta`, `OperationRequest`, `SignedOperation`, `EncodedOperation`
//! - **Confirmation**: `OperationReference`, `CommitLevel`, `ConfirmationNotice`
//! - **Time**: `Timestamp`

use crate::errors::EncodingError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use std::fmt;
use std::time::Duration;

// =============================================================================
// CLUSTER A: THE OPERATION
// =============================================================================

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// An account touched by an operation, with its access flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMeta {
    /// The account's public key.
    pub key: PublicKey,
    /// Whether the account must sign the operation.
    pub is_signer: bool,
    /// Whether the operation may write to the account.
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account.
    pub fn writable(key: PublicKey, is_signer: bool) -> Self {
        Self {
            key,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account.
    pub fn readonly(key: PublicKey, is_signer: bool) -> Self {
        Self {
            key,
            is_signer,
            is_writable: false,
        }
    }
}

/// An unsigned state-changing request built upstream.
///
/// The payload is opaque here: instruction encoding and account derivation
/// happen before the request reaches the commit coordinator. Fields are
/// private so a request cannot be altered once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequest {
    payload: Vec<u8>,
    accounts: Vec<AccountMeta>,
    fee_payer: PublicKey,
}

impl OperationRequest {
    /// Create a new operation request.
    pub fn new(payload: Vec<u8>, accounts: Vec<AccountMeta>, fee_payer: PublicKey) -> Self {
        Self {
            payload,
            accounts,
            fee_payer,
        }
    }

    /// Opaque instruction payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Ordered account list.
    pub fn accounts(&self) -> &[AccountMeta] {
        &self.accounts
    }

    /// The identity paying fees (and therefore the required signer).
    pub fn fee_payer(&self) -> &PublicKey {
        &self.fee_payer
    }

    /// Keys that must sign, fee payer first, without duplicates.
    pub fn required_signers(&self) -> Vec<PublicKey> {
        let mut signers = vec![self.fee_payer];
        for meta in &self.accounts {
            if meta.is_signer && !signers.contains(&meta.key) {
                signers.push(meta.key);
            }
        }
        signers
    }
}

/// A signature attached to an operation by a given key.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSignature {
    /// The signing key.
    pub signer: PublicKey,
    /// The signature bytes.
    #[serde_as(as = "Bytes")]
    pub signature: Signature,
}

/// An operation carrying the signatures produced by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedOperation {
    /// The request that was signed.
    pub request: OperationRequest,
    /// Signatures, fee payer first.
    pub signatures: Vec<OperationSignature>,
}

impl SignedOperation {
    /// Create a signed operation.
    pub fn new(request: OperationRequest, signatures: Vec<OperationSignature>) -> Self {
        Self {
            request,
            signatures,
        }
    }

    /// Whether the fee payer's signature is present.
    pub fn is_signed_by_fee_payer(&self) -> bool {
        self.signatures
            .iter()
            .any(|s| &s.signer == self.request.fee_payer())
    }

    /// Serialize for the wire.
    pub fn encode(&self) -> Result<EncodedOperation, EncodingError> {
        if self.signatures.is_empty() {
            return Err(EncodingError::MissingSignature);
        }
        bincode::serialize(self)
            .map(EncodedOperation)
            .map_err(|e| EncodingError::Serialization(e.to_string()))
    }
}

/// Wire bytes of a signed operation, ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedOperation(pub Vec<u8>);

impl EncodedOperation {
    /// Decode back into a signed operation.
    pub fn decode(&self) -> Result<SignedOperation, EncodingError> {
        bincode::deserialize(&self.0).map_err(|e| EncodingError::Deserialization(e.to_string()))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the encoding is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// CLUSTER B: CONFIRMATION
// =============================================================================

/// Identifier the ledger assigns to a broadcast operation (e.g. a base58
/// signature string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationReference(String);

impl OperationReference {
    /// Wrap a reference returned by the network.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// The reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durability threshold at which a notification is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum CommitLevel {
    /// Seen by the connected node.
    Processed,
    /// Voted on by a supermajority.
    #[default]
    Confirmed,
    /// Rooted; cannot be rolled back.
    Finalized,
}

impl CommitLevel {
    /// Lowercase name used on the wire and in config.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitLevel::Processed => "processed",
            CommitLevel::Confirmed => "confirmed",
            CommitLevel::Finalized => "finalized",
        }
    }

    /// Whether a notice at `self` satisfies a subscription at `requested`.
    pub fn satisfies(&self, requested: CommitLevel) -> bool {
        *self >= requested
    }
}

impl std::str::FromStr for CommitLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "processed" => Ok(CommitLevel::Processed),
            "confirmed" => Ok(CommitLevel::Confirmed),
            "finalized" => Ok(CommitLevel::Finalized),
            other => Err(format!("unknown commit level: {}", other)),
        }
    }
}

impl fmt::Display for CommitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification that an operation reached a commitment level.
///
/// `error` is the on-chain execution error, if any. `None` means the
/// operation landed successfully at `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationNotice {
    /// The operation this notice is about.
    pub reference: OperationReference,
    /// The level that was reached.
    pub level: CommitLevel,
    /// Execution error reported by the ledger.
    pub error: Option<String>,
}

impl ConfirmationNotice {
    /// A successful notice.
    pub fn success(reference: OperationReference, level: CommitLevel) -> Self {
        Self {
            reference,
            level,
            error: None,
        }
    }

    /// A notice carrying an execution error.
    pub fn failure(
        reference: OperationReference,
        level: CommitLevel,
        error: impl Into<String>,
    ) -> Self {
        Self {
            reference,
            level,
            error: Some(error.into()),
        }
    }

    /// Whether the operation executed without error.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

// =============================================================================
// CLUSTER C: TIME
// =============================================================================

/// Milliseconds since the UNIX epoch.
///
/// All arithmetic saturates so comparisons near the edges of the range stay
/// total.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Timestamp(u64);

impl Timestamp {
    /// From milliseconds since the epoch.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// From whole seconds since the epoch (ledger records store seconds).
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1_000))
    }

    /// Milliseconds since the epoch.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Whole seconds since the epoch.
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1_000
    }

    /// `self + duration`, clamped at the maximum.
    pub fn saturating_add(&self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }

    /// Time elapsed from `earlier` to `self`, zero if `earlier` is later.
    pub fn saturating_duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
