//! Domain layer: the session state machine and the three concurrency
//! primitives a session is built from.

pub mod deadline;
pub mod session;
pub mod slot;
pub mod watcher;

pub use deadline::{Deadline, TimeoutGovernor};
pub use session::CommitSession;
pub use slot::{SingleFlightSlot, SlotGuard};
pub use watcher::{ConfirmationWatcher, PendingConfirmation, WatchHandle};
