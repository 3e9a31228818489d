//! Integration flows
//!
//! - commit_flows: Commit Coordinator end to end over the in-process bus
//! - lifecycle_flows: Lifecycle Classifier walked through a campaign's life

pub mod commit_flows;
pub mod fixtures;
pub mod lifecycle_flows;
