//! Coordinator registry
//!
//! One coordinator (and so one single-flight slot) per action site, all
//! sharing the same adapters. Sites are independent: a hung ticket purchase
//! does not block a hype vote.

use crate::adapters::NoopOutcomeReporter;
use crate::config::CommitConfig;
use crate::error::CommitResult;
use crate::ports::outbound::{Broadcaster, Clock, OutcomeReporter, Signer, SubscriptionService};
use crate::service::CommitCoordinator;
use parking_lot::RwLock;
use shared_types::{ActionSite, OperationRequest, Outcome};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Lazily built coordinators keyed by action site.
pub struct CoordinatorRegistry<S, B, N, C>
where
    S: Signer,
    B: Broadcaster,
    N: SubscriptionService,
    C: Clock,
{
    config: CommitConfig,
    signer: Arc<S>,
    broadcaster: Arc<B>,
    subscriptions: Arc<N>,
    clock: Arc<C>,
    reporter: Arc<dyn OutcomeReporter>,
    coordinators: RwLock<HashMap<ActionSite, Arc<CommitCoordinator<S, B, N, C>>>>,
}

impl<S, B, N, C> CoordinatorRegistry<S, B, N, C>
where
    S: Signer,
    B: Broadcaster,
    N: SubscriptionService,
    C: Clock,
{
    /// Create a registry. Fails if `config` does not validate.
    pub fn new(
        config: CommitConfig,
        signer: Arc<S>,
        broadcaster: Arc<B>,
        subscriptions: Arc<N>,
        clock: Arc<C>,
    ) -> CommitResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            signer,
            broadcaster,
            subscriptions,
            clock,
            reporter: Arc::new(NoopOutcomeReporter),
            coordinators: RwLock::new(HashMap::new()),
        })
    }

    /// Reporter handed to every coordinator created afterwards.
    pub fn with_reporter(mut self, reporter: Arc<dyn OutcomeReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &CommitConfig {
        &self.config
    }

    /// The coordinator for `site`, created on first use.
    pub fn coordinator(&self, site: ActionSite) -> Arc<CommitCoordinator<S, B, N, C>> {
        if let Some(existing) = self.coordinators.read().get(&site) {
            return Arc::clone(existing);
        }

        let mut coordinators = self.coordinators.write();
        let coordinator = coordinators.entry(site).or_insert_with(|| {
            debug!(%site, "[lp-01] Creating coordinator");
            Arc::new(
                CommitCoordinator::new(
                    site,
                    Arc::clone(&self.signer),
                    Arc::clone(&self.broadcaster),
                    Arc::clone(&self.subscriptions),
                    Arc::clone(&self.clock),
                )
                .with_reporter(Arc::clone(&self.reporter))
                .with_signer_timeout(self.config.signer_timeout),
            )
        });
        Arc::clone(coordinator)
    }

    /// Submit with the site's configured timeout and the default level.
    pub async fn submit_for(
        &self,
        site: ActionSite,
        request: OperationRequest,
    ) -> CommitResult<Outcome> {
        let coordinator = self.coordinator(site);
        coordinator
            .submit(
                request,
                self.config.commit_level,
                self.config.timeout_for(site),
            )
            .await
    }

    /// Sites with a live session right now.
    pub fn busy_sites(&self) -> Vec<ActionSite> {
        let coordinators = self.coordinators.read();
        ActionSite::ALL
            .into_iter()
            .filter(|site| coordinators.get(site).is_some_and(|c| c.is_busy()))
            .collect()
    }
}
