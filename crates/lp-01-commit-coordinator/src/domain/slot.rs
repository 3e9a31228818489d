//! Single-flight slot
//!
//! Each action site owns one slot holding at most one live session id.
//! Checking for emptiness and occupying happen under one lock, so two
//! concurrent submissions can never both see the slot empty.
//!
//! Occupying returns a [`SlotGuard`]; the slot empties when the guard drops,
//! whether the session finished normally, returned an error, panicked or had
//! its future dropped.

use parking_lot::Mutex;
use shared_types::{ActionSite, SessionId};
use std::sync::Arc;
use tracing::debug;

/// Per-site occupancy cell.
#[derive(Debug, Clone)]
pub struct SingleFlightSlot {
    site: ActionSite,
    occupant: Arc<Mutex<Option<SessionId>>>,
}

impl SingleFlightSlot {
    pub fn new(site: ActionSite) -> Self {
        Self {
            site,
            occupant: Arc::new(Mutex::new(None)),
        }
    }

    /// Occupy the slot for `session_id`, or `None` if it is taken.
    pub fn try_occupy(&self, session_id: SessionId) -> Option<SlotGuard> {
        let mut occupant = self.occupant.lock();
        if occupant.is_some() {
            return None;
        }
        *occupant = Some(session_id);
        drop(occupant);

        debug!(site = %self.site, %session_id, "[lp-01] slot occupied");
        Some(SlotGuard {
            site: self.site,
            session_id,
            occupant: Arc::clone(&self.occupant),
        })
    }

    /// Session currently holding the slot.
    pub fn occupant(&self) -> Option<SessionId> {
        *self.occupant.lock()
    }

    pub fn is_empty(&self) -> bool {
        self.occupant.lock().is_none()
    }

    pub fn site(&self) -> ActionSite {
        self.site
    }
}

/// Proof of occupancy. Empties the slot on drop.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the guard is dropped"]
pub struct SlotGuard {
    site: ActionSite,
    session_id: SessionId,
    occupant: Arc<Mutex<Option<SessionId>>>,
}

impl SlotGuard {
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let mut occupant = self.occupant.lock();
        if *occupant == Some(self.session_id) {
            *occupant = None;
        }
        drop(occupant);
        debug!(site = %self.site, session_id = %self.session_id, "[lp-01] slot released");
    }
}
