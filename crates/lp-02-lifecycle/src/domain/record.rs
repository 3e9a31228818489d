//! Persisted inputs to classification.
//!
//! Both records are owned by the ledger and only read here.

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;

/// A campaign's on-ledger fields that classification depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CampaignRecord {
    /// When ticket sales open.
    pub launch_time: Timestamp,
    /// When ticket sales close.
    pub end_time: Timestamp,
    pub units_sold: u64,
    pub units_offered: u64,
    /// Whether the creator has set up the liquidity pool.
    pub liquidity_established: bool,
}

impl CampaignRecord {
    /// At least as many units sold as offered.
    pub fn sold_out(&self) -> bool {
        self.units_sold >= self.units_offered
    }
}

/// One participant's join record for a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ParticipationRecord {
    /// Tickets already checked.
    pub claimed_units: u64,
    /// Tickets bought.
    pub total_units: u64,
    /// Tickets that won, among those checked.
    pub winning_units: u64,
}

impl ParticipationRecord {
    /// Whether any bought ticket is still unchecked.
    pub fn has_unchecked(&self) -> bool {
        self.claimed_units < self.total_units
    }
}
