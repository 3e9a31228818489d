//! Subscription service over the in-process event bus.
//!
//! Each listener is a task reading a filtered bus subscription. The bus
//! subscription is taken before `on_notification` returns, so a notice
//! published afterwards cannot be missed. Cancelling aborts the task, which
//! drops the bus subscription.

use crate::ports::outbound::{
    NotificationCallback, SubscriptionFailure, SubscriptionHandle, SubscriptionService,
};
use parking_lot::Mutex;
use shared_bus::{EventFilter, InMemoryEventBus, LedgerEvent};
use shared_types::{CommitLevel, OperationReference};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// `SubscriptionService` backed by `shared-bus` confirmation notices.
pub struct BusSubscriptionService {
    event_bus: Arc<InMemoryEventBus>,
    next_id: AtomicU64,
    listeners: Arc<Mutex<HashMap<u64, JoinHandle<()>>>>,
}

impl BusSubscriptionService {
    pub fn new(event_bus: Arc<InMemoryEventBus>) -> Self {
        Self {
            event_bus,
            next_id: AtomicU64::new(1),
            listeners: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Listeners registered and not yet fired or cancelled.
    pub fn active_listeners(&self) -> usize {
        self.listeners.lock().len()
    }
}

impl SubscriptionService for BusSubscriptionService {
    fn on_notification(
        &self,
        reference: &OperationReference,
        level: CommitLevel,
        callback: NotificationCallback,
    ) -> Result<SubscriptionHandle, SubscriptionFailure> {
        let runtime = Handle::try_current()
            .map_err(|e| SubscriptionFailure(format!("no async runtime: {}", e)))?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut subscription = self
            .event_bus
            .subscribe(EventFilter::notices_for(reference.clone(), level));
        let listeners = Arc::clone(&self.listeners);

        // Hold the map lock across spawn so the task's own removal cannot
        // run before its insertion.
        let mut registered = self.listeners.lock();
        let task = runtime.spawn(async move {
            let notice = loop {
                match subscription.recv().await {
                    Some(LedgerEvent::OperationNotice(notice)) => break Some(notice),
                    Some(_) => continue,
                    None => break None,
                }
            };
            listeners.lock().remove(&id);
            drop(subscription);
            match notice {
                Some(notice) => callback(notice),
                None => debug!(handle = id, "[lp-01] event bus closed before notice"),
            }
        });
        registered.insert(id, task);
        drop(registered);

        debug!(handle = id, %reference, level = %level, "[lp-01] bus listener registered");
        Ok(SubscriptionHandle(id))
    }

    fn cancel(&self, handle: SubscriptionHandle) {
        if let Some(task) = self.listeners.lock().remove(&handle.0) {
            task.abort();
            debug!(handle = handle.0, "[lp-01] bus listener aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{EventPublisher, EventTopic, DEFAULT_CHANNEL_CAPACITY};
    use shared_types::{ActionSite, CommitEvent, ConfirmationNotice, SessionState, Timestamp};
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn reference() -> OperationReference {
        OperationReference::new("4bus")
    }

    #[tokio::test]
    async fn test_delivers_matching_notice_once() {
        let bus = Arc::new(InMemoryEventBus::new());
        let service = BusSubscriptionService::new(Arc::clone(&bus));
        let (tx, rx) = oneshot::channel();

        service
            .on_notification(
                &reference(),
                CommitLevel::Confirmed,
                Box::new(move |notice| {
                    let _ = tx.send(notice);
                }),
            )
            .unwrap();
        assert_eq!(service.active_listeners(), 1);

        // Wrong reference and insufficient level are filtered out.
        bus.publish(LedgerEvent::OperationNotice(ConfirmationNotice::success(
            OperationReference::new("other"),
            CommitLevel::Finalized,
        )))
        .await;
        bus.publish(LedgerEvent::OperationNotice(ConfirmationNotice::success(
            reference(),
            CommitLevel::Processed,
        )))
        .await;
        bus.publish(LedgerEvent::OperationNotice(ConfirmationNotice::success(
            reference(),
            CommitLevel::Confirmed,
        )))
        .await;

        let notice = tokio::time::timeout(Duration::from_secs(1), rx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(notice.level, CommitLevel::Confirmed);
        assert_eq!(service.active_listeners(), 0);
    }

    #[tokio::test]
    async fn test_cancel_aborts_listener_and_is_idempotent() {
        let bus = Arc::new(InMemoryEventBus::new());
        let service = BusSubscriptionService::new(Arc::clone(&bus));

        let handle = service
            .on_notification(&reference(), CommitLevel::Confirmed, Box::new(|_| {}))
            .unwrap();
        assert_eq!(bus.subscriber_count(EventTopic::Confirmation), 1);

        service.cancel(handle);
        service.cancel(handle);
        assert_eq!(service.active_listeners(), 0);

        // The aborted task drops its bus subscription once the runtime
        // gets to it.
        for _ in 0..10 {
            if bus.subscriber_count(EventTopic::Confirmation) == 0 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(bus.subscriber_count(EventTopic::Confirmation), 0);
    }

    #[tokio::test]
    async fn test_notice_survives_lifecycle_burst() {
        let bus = Arc::new(InMemoryEventBus::new());
        let service = BusSubscriptionService::new(Arc::clone(&bus));
        let (tx, rx) = oneshot::channel();

        service
            .on_notification(
                &reference(),
                CommitLevel::Confirmed,
                Box::new(move |notice| {
                    let _ = tx.send(notice);
                }),
            )
            .unwrap();

        // Published before the listener task first runs, so without a
        // separate channel the notice would land behind a full buffer.
        for _ in 0..DEFAULT_CHANNEL_CAPACITY * 2 {
            bus.publish(LedgerEvent::Commit(CommitEvent {
                session_id: uuid::Uuid::new_v4(),
                site: ActionSite::HypeVote,
                state: SessionState::Signing,
                reference: None,
                outcome: None,
                at: Timestamp::from_millis(0),
            }))
            .await;
        }
        bus.publish(LedgerEvent::OperationNotice(ConfirmationNotice::success(
            reference(),
            CommitLevel::Confirmed,
        )))
        .await;

        let notice = tokio::time::timeout(Duration::from_secs(1), rx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(notice.reference, reference());
    }

    #[test]
    fn test_requires_runtime() {
        let bus = Arc::new(InMemoryEventBus::new());
        let service = BusSubscriptionService::new(bus);

        let result = service.on_notification(&reference(), CommitLevel::Confirmed, Box::new(|_| {}));
        assert!(result.is_err());
    }
}
