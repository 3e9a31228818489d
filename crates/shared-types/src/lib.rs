//! # Shared Types Crate
//!
//! Ledger entities and commit vocabulary used by every launchpad crate.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Opaque Payloads**: An `OperationRequest` is built upstream; nothing in
//!   this workspace interprets its instruction bytes.
//! - **One Terminal Outcome**: `Outcome` is the only way a commit session
//!   reports how it ended.

pub mod commit;
pub mod entities;
pub mod errors;

pub use commit::*;
pub use entities::*;
pub use errors::*;
