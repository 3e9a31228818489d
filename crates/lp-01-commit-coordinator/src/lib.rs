//! # lp-01-commit-coordinator
//!
//! Sign, broadcast and confirm one ledger operation per user action, with a
//! single outcome per attempt.
//!
//! ## Overview
//!
//! - **Single-flight**: at most one live session per action site; a second
//!   submit while one is live is rejected without side effects.
//! - **Confirmation race**: the confirmation watcher and the deadline race;
//!   exactly one of them decides the outcome and the other is cancelled.
//! - **Named timeouts**: every site has a configured deadline (hype voting
//!   uses a shorter one).
//! - **Lifecycle events**: every session reports `Signing`, `Broadcasting`,
//!   `AwaitingConfirmation` and one terminal state.
//!
//! ## Session Flow
//!
//! ```text
//! submit ──→ [slot] ──busy──→ Err(ConcurrentSubmissionRejected)
//!              │
//!              ▼
//!          Signer ──reject──→ Failed(UserRejected)
//!              │
//!              ▼
//!        Broadcaster ──reject──→ Failed(BroadcastRejected)
//!              │
//!              ▼
//!     ┌── watcher ──notice──→ Confirmed / Failed(ConfirmationError)
//!     │
//!     └── deadline ──fires──→ TimedOut
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use lp_01_commit_coordinator::{CommitConfig, CoordinatorRegistry};
//! use lp_01_commit_coordinator::adapters::{BusSubscriptionService, TokioClock};
//!
//! let registry = CoordinatorRegistry::new(
//!     CommitConfig::from_env(),
//!     wallet,
//!     rpc,
//!     Arc::new(BusSubscriptionService::new(bus.clone())),
//!     Arc::new(TokioClock::new()),
//! )?;
//!
//! let outcome = registry.submit_for(ActionSite::TicketPurchase, request).await?;
//! println!("{}", outcome.user_message());
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod registry;
pub mod service;

pub use config::{
    CommitConfig, ConfigError, DEFAULT_CONFIRMATION_TIMEOUT, HYPE_VOTE_CONFIRMATION_TIMEOUT,
};
pub use domain::{CommitSession, SingleFlightSlot};
pub use error::{CommitError, CommitResult};
pub use ports::inbound::CommitApi;
pub use registry::CoordinatorRegistry;
pub use service::CommitCoordinator;
