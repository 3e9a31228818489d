//! Driven Ports (SPI - Outbound)

use shared_types::Timestamp;

/// Wall-clock source for `classify_now`.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}
