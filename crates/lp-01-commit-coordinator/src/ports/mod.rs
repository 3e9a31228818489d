//! Ports (hexagonal boundaries)
//!
//! - `inbound`: what the application calls (`CommitApi`)
//! - `outbound`: what the coordinator calls (signer, broadcaster,
//!   subscription service, clock, outcome reporter)

pub mod inbound;
pub mod outbound;

pub use inbound::CommitApi;
pub use outbound::{
    BroadcastError, BroadcastResponse, Broadcaster, Clock, Elapsed, NotificationCallback,
    OutcomeReporter, Signer, SignerError, SubscriptionFailure, SubscriptionHandle,
    SubscriptionService,
};
