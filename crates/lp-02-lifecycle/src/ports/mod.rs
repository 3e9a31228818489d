//! Ports (hexagonal boundaries)
//!
//! - `inbound`: `LifecycleApi`
//! - `outbound`: `TimeSource`

pub mod inbound;
pub mod outbound;

pub use inbound::LifecycleApi;
pub use outbound::TimeSource;
