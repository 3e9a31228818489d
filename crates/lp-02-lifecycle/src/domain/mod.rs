//! Domain module for the Lifecycle Classifier
//!
//! - record: campaign and participation records read from the ledger
//! - state: the ten lifecycle states and their wire names
//! - classifier: the priority-ordered rules

pub mod classifier;
pub mod record;
pub mod state;

pub use classifier::{classify, next_transition_at, LIQUIDITY_TIMEOUT};
pub use record::{CampaignRecord, ParticipationRecord};
pub use state::LifecycleState;
