//! # Shared Bus - In-Process Event Bus
//!
//! Carries two kinds of traffic between the ledger connection and the
//! launchpad's commit machinery:
//!
//! - **Confirmation notices** pushed by the ledger feed, consumed by
//!   confirmation watchers.
//! - **Commit lifecycle events** emitted by commit sessions, consumed by
//!   whatever presents outcomes to the user.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────────┐
//! │ Ledger feed  │                    │ Confirmation     │
//! │              │    publish()       │ watcher (lp-01)  │
//! │              │ ──────┐            │                  │
//! └──────────────┘       │            └──────────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Each topic has its own channel. Subscriptions are filtered on the
//! receiving side, and cancelling a waiter is just dropping it.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod bus;
pub mod events;
pub mod subscription;

// Re-export main types
pub use bus::{EventPublisher, InMemoryEventBus};
pub use events::{EventFilter, EventTopic, LedgerEvent};
pub use subscription::{Subscription, SubscriptionError};

/// Events buffered per topic channel before a slow subscriber lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
