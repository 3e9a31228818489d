//! Driving Ports (API - Inbound)

use crate::error::CommitResult;
use async_trait::async_trait;
use shared_types::{ActionSite, CommitLevel, OperationRequest, Outcome};
use std::time::Duration;

/// Primary Commit API
///
/// One implementation serves one action site. The surrounding application
/// builds an `OperationRequest` and hands it over; everything from signing
/// to the terminal outcome happens behind this call.
#[async_trait]
pub trait CommitApi: Send + Sync {
    /// Sign, broadcast and confirm one operation.
    ///
    /// Returns `Ok(outcome)` for every session that ran, whatever its
    /// result. Returns `Err(ConcurrentSubmissionRejected)` without touching
    /// the signer when the site already has a live session.
    async fn submit(
        &self,
        request: OperationRequest,
        level: CommitLevel,
        timeout: Duration,
    ) -> CommitResult<Outcome>;

    /// Action site this coordinator serves.
    fn site(&self) -> ActionSite;

    /// Whether a session is currently live for the site.
    fn is_busy(&self) -> bool;
}
