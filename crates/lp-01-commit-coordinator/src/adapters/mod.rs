//! Adapters for external dependencies
//!
//! - `clock`: tokio-backed [`Clock`](crate::ports::Clock)
//! - `bus_subscription`: [`SubscriptionService`](crate::ports::SubscriptionService)
//!   over the in-process event bus
//! - `reporter`: [`OutcomeReporter`](crate::ports::OutcomeReporter)
//!   implementations (event bus, no-op, in-memory)

pub mod bus_subscription;
pub mod clock;
pub mod reporter;

pub use bus_subscription::BusSubscriptionService;
pub use clock::TokioClock;
pub use reporter::{EventBusOutcomeReporter, NoopOutcomeReporter, RecordingOutcomeReporter};
