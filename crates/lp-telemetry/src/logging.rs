//! Structured logging.
//!
//! Every line carries the `component` field so lines from the commit
//! coordinator and the lifecycle classifier can be told apart after shipping.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global `tracing` subscriber.
///
/// Fails if a global subscriber is already set or the filter directive does
/// not parse.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(&config.log_level)?;

    let output = if !config.console_output {
        None
    } else if config.json_logs {
        Some(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .boxed(),
        )
    } else {
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(true)
                .boxed(),
        )
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(output)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// `RUST_LOG` wins over the configured level when set.
fn build_filter(log_level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))
}

/// Helper to create structured log entries with a component field.
#[macro_export]
macro_rules! log_event {
    ($level:ident, $component:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = $component,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a commit-session event with standard fields.
#[macro_export]
macro_rules! log_session_event {
    ($level:ident, $msg:expr, $session_id:expr, $site:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = "lp-01",
            session_id = %$session_id,
            site = %$site,
            $($($field)*,)?
            $msg
        )
    };
}
