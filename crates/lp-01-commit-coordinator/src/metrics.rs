//! # Commit Metrics
//!
//! Prometheus metrics for commit sessions.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! lp-01-commit-coordinator = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `commit_outcomes_total{site, kind}` - Terminal outcomes by site and kind
//! - `commit_concurrent_rejections_total{site}` - Submissions refused by the
//!   single-flight slot
//! - `commit_confirmation_seconds{site}` - Time from broadcast to the terminal
//!   outcome of sessions that reached `AwaitingConfirmation`

use shared_types::{ActionSite, Outcome};
use std::time::Duration;

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Terminal outcomes, labeled by site and outcome kind
    pub static ref COMMIT_OUTCOMES: IntCounterVec = register_int_counter_vec!(
        "commit_outcomes_total",
        "Total number of commit sessions by terminal outcome",
        &["site", "kind"]
    )
    .expect("Failed to create COMMIT_OUTCOMES metric");

    /// Submissions refused because the site was busy
    pub static ref CONCURRENT_REJECTIONS: IntCounterVec = register_int_counter_vec!(
        "commit_concurrent_rejections_total",
        "Total number of submissions rejected by the single-flight slot",
        &["site"]
    )
    .expect("Failed to create CONCURRENT_REJECTIONS metric");

    /// Broadcast-to-outcome latency
    pub static ref CONFIRMATION_SECONDS: HistogramVec = register_histogram_vec!(
        "commit_confirmation_seconds",
        "Time from accepted broadcast to terminal outcome",
        &["site"],
        vec![0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 60.0]
    )
    .expect("Failed to create CONFIRMATION_SECONDS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a terminal outcome
#[cfg(feature = "metrics")]
pub fn record_outcome(site: ActionSite, outcome: &Outcome) {
    COMMIT_OUTCOMES
        .with_label_values(&[site.as_str(), outcome.kind()])
        .inc();
}

/// Record a rejected concurrent submission
#[cfg(feature = "metrics")]
pub fn record_concurrent_rejection(site: ActionSite) {
    CONCURRENT_REJECTIONS.with_label_values(&[site.as_str()]).inc();
}

/// Record broadcast-to-outcome latency
#[cfg(feature = "metrics")]
pub fn record_confirmation_latency(site: ActionSite, latency: Duration) {
    CONFIRMATION_SECONDS
        .with_label_values(&[site.as_str()])
        .observe(latency.as_secs_f64());
}

// No-op implementations when metrics feature is disabled

#[cfg(not(feature = "metrics"))]
pub fn record_outcome(_site: ActionSite, _outcome: &Outcome) {}

#[cfg(not(feature = "metrics"))]
pub fn record_concurrent_rejection(_site: ActionSite) {}

#[cfg(not(feature = "metrics"))]
pub fn record_confirmation_latency(_site: ActionSite, _latency: Duration) {}
