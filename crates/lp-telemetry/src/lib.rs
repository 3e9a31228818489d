//! # Launchpad Telemetry
//!
//! Process-wide observability setup for the launchpad client.
//!
//! ## Components
//!
//! - **Logging**: `tracing` subscriber with an `EnvFilter`, pretty output for
//!   development and JSON output for log shipping.
//! - **Metrics**: text exposition of everything registered in the default
//!   Prometheus registry (the commit coordinator registers there when built
//!   with its `metrics` feature).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lp_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // ...
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LP_SERVICE_NAME` | `launchpad` | Service name attached to log lines |
//! | `LP_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `LP_CONSOLE_OUTPUT` | `true` | Emit logs to stdout |
//! | `LP_JSON_LOGS` | `false` | JSON formatted logs |

mod config;
pub mod logging;
mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::encode_metrics;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to encode metrics: {0}")]
    MetricsEncode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging for the process.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(&config)?;

    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl TelemetryGuard {
    /// Service name the process logs under.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}

/// Convenience macro for creating a span with component context.
///
/// ```rust,ignore
/// let _span = lp_telemetry::component_span!("submit", component = "lp-01", site = "hype_vote");
/// ```
#[macro_export]
macro_rules! component_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
