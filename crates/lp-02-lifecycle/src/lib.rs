//! # lp-02-lifecycle
//!
//! Lifecycle Classifier: maps a campaign record, the current time and
//! (optionally) a participant's join record to one of ten lifecycle states.
//!
//! ## Overview
//!
//! - **Pure**: `classify` performs no I/O, keeps no state and is total over
//!   its inputs.
//! - **Priority ordered**: the rules are checked in a fixed order and the
//!   first match wins; `PRE_LAUNCH` is the fallback.
//! - **Not cached**: callers re-classify on demand, optionally at
//!   `next_transition_at`.
//!
//! | # | State | Condition |
//! |---|-------|-----------|
//! | 1 | ACTIVE_NO_TICKETS | launch ≤ now < end, no participation |
//! | 2 | ACTIVE_TICKETS | launch ≤ now < end, participation |
//! | 3 | MINT_FAILED_REFUNDED | now ≥ end, sold < offered, no participation |
//! | 4 | MINT_FAILED_NOT_REFUNDED | now ≥ end, sold < offered, participation |
//! | 5 | MINT_SUCCEEDED_NO_TICKETS | now ≥ end, sold ≥ offered, no participation |
//! | 6 | MINT_SUCCEDED_TICKETS_TO_CHECK | mint succeeded, claimed < total |
//! | 7 | MINT_SUCCEEDED_TICKETS_CHECKED_LP | all claimed, liquidity |
//! | 8 | MINT_SUCCEEDED_TICKETS_CHECKED_NO_LP | all claimed, no liquidity |
//! | 9 | MINT_SUCCEEDED_TICKETS_CHECKED_LP_TIMEOUT | #8 and now ≥ end + 14 days (shadowed by #8) |
//! | 10 | PRE_LAUNCH | otherwise |
//!
//! ## Example
//!
//! ```rust,ignore
//! use lp_02_lifecycle::{LifecycleService, SystemTimeSource};
//! use lp_02_lifecycle::ports::LifecycleApi;
//!
//! let service = LifecycleService::new(Arc::new(SystemTimeSource));
//! let state = service.classify_now(&record, participation.as_ref());
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{FixedTimeSource, SystemTimeSource};
pub use domain::{
    classify, next_transition_at, CampaignRecord, LifecycleState, ParticipationRecord,
    LIQUIDITY_TIMEOUT,
};
pub use ports::{LifecycleApi, TimeSource};
pub use service::LifecycleService;
