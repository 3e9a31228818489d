//! Lifecycle states
//!
//! ```text
//! [PRE_LAUNCH] ──launch──→ [ACTIVE_*] ──end──┬── sold < offered ──→ [MINT_FAILED_*]
//!                                            │
//!                                            └── sold ≥ offered ──→ [MINT_SUCCEEDED_NO_TICKETS]
//!                                                                   [MINT_SUCCEDED_TICKETS_TO_CHECK]
//!                                                                          │ all checked
//!                                                                          ▼
//!                                                                   [..._CHECKED_NO_LP] ──lp──→ [..._CHECKED_LP]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a campaign is in its life, as seen by one viewer.
///
/// Derived on demand; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    #[serde(rename = "PRE_LAUNCH")]
    PreLaunch,
    #[serde(rename = "ACTIVE_NO_TICKETS")]
    ActiveNoTickets,
    #[serde(rename = "ACTIVE_TICKETS")]
    ActiveTickets,
    #[serde(rename = "MINT_FAILED_REFUNDED")]
    MintFailedRefunded,
    #[serde(rename = "MINT_FAILED_NOT_REFUNDED")]
    MintFailedNotRefunded,
    #[serde(rename = "MINT_SUCCEEDED_NO_TICKETS")]
    MintSucceededNoTickets,
    #[serde(rename = "MINT_SUCCEDED_TICKETS_TO_CHECK")]
    MintSucceededTicketsToCheck,
    #[serde(rename = "MINT_SUCCEEDED_TICKETS_CHECKED_LP")]
    MintSucceededTicketsCheckedLp,
    #[serde(rename = "MINT_SUCCEEDED_TICKETS_CHECKED_NO_LP")]
    MintSucceededTicketsCheckedNoLp,
    #[serde(rename = "MINT_SUCCEEDED_TICKETS_CHECKED_LP_TIMEOUT")]
    MintSucceededTicketsCheckedLpTimeout,
}

impl LifecycleState {
    /// Every state, in classification priority order with the default last.
    pub const ALL: [LifecycleState; 10] = [
        LifecycleState::ActiveNoTickets,
        LifecycleState::ActiveTickets,
        LifecycleState::MintFailedRefunded,
        LifecycleState::MintFailedNotRefunded,
        LifecycleState::MintSucceededNoTickets,
        LifecycleState::MintSucceededTicketsToCheck,
        LifecycleState::MintSucceededTicketsCheckedLp,
        LifecycleState::MintSucceededTicketsCheckedNoLp,
        LifecycleState::MintSucceededTicketsCheckedLpTimeout,
        LifecycleState::PreLaunch,
    ];

    /// Wire name. `MINT_SUCCEDED_TICKETS_TO_CHECK` keeps its historical spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::PreLaunch => "PRE_LAUNCH",
            LifecycleState::ActiveNoTickets => "ACTIVE_NO_TICKETS",
            LifecycleState::ActiveTickets => "ACTIVE_TICKETS",
            LifecycleState::MintFailedRefunded => "MINT_FAILED_REFUNDED",
            LifecycleState::MintFailedNotRefunded => "MINT_FAILED_NOT_REFUNDED",
            LifecycleState::MintSucceededNoTickets => "MINT_SUCCEEDED_NO_TICKETS",
            LifecycleState::MintSucceededTicketsToCheck => "MINT_SUCCEDED_TICKETS_TO_CHECK",
            LifecycleState::MintSucceededTicketsCheckedLp => "MINT_SUCCEEDED_TICKETS_CHECKED_LP",
            LifecycleState::MintSucceededTicketsCheckedNoLp => {
                "MINT_SUCCEEDED_TICKETS_CHECKED_NO_LP"
            }
            LifecycleState::MintSucceededTicketsCheckedLpTimeout => {
                "MINT_SUCCEEDED_TICKETS_CHECKED_LP_TIMEOUT"
            }
        }
    }

    /// Ticket sales are open.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            LifecycleState::ActiveNoTickets | LifecycleState::ActiveTickets
        )
    }

    /// Nothing is left for the participant to do: no purchase, refund or
    /// ticket check is pending.
    pub fn is_terminal_for_participant(&self) -> bool {
        matches!(
            self,
            LifecycleState::MintFailedRefunded
                | LifecycleState::MintSucceededNoTickets
                | LifecycleState::MintSucceededTicketsCheckedLp
                | LifecycleState::MintSucceededTicketsCheckedNoLp
                | LifecycleState::MintSucceededTicketsCheckedLpTimeout
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
