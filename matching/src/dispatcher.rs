//! Bounded queue between the claim engine and the matching service.
//!
//! Reporting a found item must never wait on the matching service. The engine
//! calls [`MatchQueue::enqueue`], which only ever does a `try_send`; a worker
//! task drains the queue and submits each candidate with retry. When the
//! queue is full the candidate is dropped and counted.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use reclaim_claims::MatchQueue;
use reclaim_types::Item;

use crate::backoff::RetryPolicy;
use crate::candidate::MatchCandidate;
use crate::client::Matcher;
use crate::metrics::DispatchMetrics;

/// Sending half of the match queue.
pub struct MatchDispatcher {
    tx: mpsc::Sender<MatchCandidate>,
    metrics: Arc<DispatchMetrics>,
}

/// Receiving half, consumed by [`run_worker`].
pub struct MatchReceiver {
    rx: mpsc::Receiver<MatchCandidate>,
}

impl MatchDispatcher {
    /// Create a queue holding at most `capacity` pending candidates.
    pub fn channel(capacity: usize, metrics: Arc<DispatchMetrics>) -> (Self, MatchReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx, metrics }, MatchReceiver { rx })
    }

    /// Create the queue and spawn its worker on the current runtime.
    pub fn spawn(
        capacity: usize,
        matcher: Arc<dyn Matcher>,
        policy: RetryPolicy,
        metrics: Arc<DispatchMetrics>,
        shutdown: broadcast::Receiver<()>,
    ) -> (Self, JoinHandle<()>) {
        let (dispatcher, receiver) = Self::channel(capacity, metrics.clone());
        let handle = tokio::spawn(run_worker(receiver, matcher, policy, metrics, shutdown));
        (dispatcher, handle)
    }

    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }
}

impl MatchQueue for MatchDispatcher {
    fn enqueue(&self, item: &Item) {
        match self.tx.try_send(MatchCandidate::from(item)) {
            Ok(()) => {
                self.metrics.enqueued.inc();
                debug!(item = %item.id, "queued for matching");
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.metrics.dropped.inc();
                warn!(item = %item.id, "match queue full, dropping candidate");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.metrics.dropped.inc();
                warn!(item = %item.id, "match worker stopped, dropping candidate");
            }
        }
    }
}

/// Drain the queue until shutdown fires or every sender is gone.
pub async fn run_worker(
    mut receiver: MatchReceiver,
    matcher: Arc<dyn Matcher>,
    policy: RetryPolicy,
    metrics: Arc<DispatchMetrics>,
    mut shutdown: broadcast::Receiver<()>,
) {
    info!("match worker started");
    loop {
        let candidate = tokio::select! {
            _ = shutdown.recv() => break,
            next = receiver.rx.recv() => match next {
                Some(candidate) => candidate,
                None => break,
            },
        };
        if !deliver(&*matcher, &policy, &metrics, &candidate, &mut shutdown).await {
            break;
        }
    }
    info!("match worker stopped");
}

/// Submit one candidate with retry. Returns `false` if shutdown interrupted
/// the backoff.
async fn deliver(
    matcher: &dyn Matcher,
    policy: &RetryPolicy,
    metrics: &DispatchMetrics,
    candidate: &MatchCandidate,
    shutdown: &mut broadcast::Receiver<()>,
) -> bool {
    let mut attempt = 1;
    loop {
        match matcher.submit(candidate).await {
            Ok(()) => {
                metrics.succeeded.inc();
                debug!(item = %candidate.item_id, attempt, "candidate accepted");
                return true;
            }
            Err(e) if policy.should_retry(attempt) => {
                metrics.retried.inc();
                let delay = policy.delay_for(attempt);
                warn!(item = %candidate.item_id, attempt, ?delay, error = %e, "match attempt failed, retrying");
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.recv() => return false,
                }
                attempt += 1;
            }
            Err(e) => {
                metrics.failed.inc();
                warn!(item = %candidate.item_id, attempt, error = %e, "giving up on match candidate");
                return true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use prometheus::Registry;
    use reclaim_types::{ItemDetails, ItemId, ItemStatus, ItemType, Timestamp, UserId};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Fails the first `failures` submissions, then accepts.
    struct FlakyMatcher {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Matcher for FlakyMatcher {
        async fn submit(&self, _candidate: &MatchCandidate) -> Result<(), MatchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(MatchError::Rejected(503))
            } else {
                Ok(())
            }
        }
    }

    fn item() -> Item {
        Item {
            id: ItemId::generate(),
            kind: ItemType::Found,
            status: ItemStatus::Open,
            finder_id: Some(UserId::new("finder").unwrap()),
            owner_id: None,
            verifications: Vec::new(),
            attached_qr: None,
            contacts: Vec::new(),
            show_phone: false,
            details: ItemDetails {
                title: "Laptop".into(),
                description: String::new(),
                category_id: uuid::Uuid::nil(),
                location_id: None,
                location_description: String::new(),
                image_url: String::new(),
                event_date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                urgency: None,
                offer_reward: false,
                return_method: None,
                cod: false,
            },
            created_at: Timestamp::new(1),
        }
    }

    fn metrics() -> Arc<DispatchMetrics> {
        Arc::new(DispatchMetrics::register(&Registry::new()).unwrap())
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    #[test]
    fn full_queue_drops_without_blocking() {
        let metrics = metrics();
        let (dispatcher, _receiver) = MatchDispatcher::channel(1, metrics.clone());
        dispatcher.enqueue(&item());
        dispatcher.enqueue(&item());
        dispatcher.enqueue(&item());
        assert_eq!(metrics.enqueued.get(), 1);
        assert_eq!(metrics.dropped.get(), 2);
    }

    #[test]
    fn closed_queue_drops() {
        let metrics = metrics();
        let (dispatcher, receiver) = MatchDispatcher::channel(4, metrics.clone());
        drop(receiver);
        dispatcher.enqueue(&item());
        assert_eq!(metrics.dropped.get(), 1);
    }

    #[tokio::test]
    async fn worker_retries_until_success() {
        let metrics = metrics();
        let matcher = Arc::new(FlakyMatcher {
            failures: 2,
            calls: AtomicU32::new(0),
        });
        let (_tx, shutdown) = broadcast::channel(1);
        let (dispatcher, receiver) = MatchDispatcher::channel(4, metrics.clone());
        dispatcher.enqueue(&item());
        drop(dispatcher);

        run_worker(receiver, matcher.clone(), fast_policy(5), metrics.clone(), shutdown).await;

        assert_eq!(matcher.calls.load(Ordering::SeqCst), 3);
        assert_eq!(metrics.retried.get(), 2);
        assert_eq!(metrics.succeeded.get(), 1);
        assert_eq!(metrics.failed.get(), 0);
    }

    #[tokio::test]
    async fn worker_gives_up_after_max_attempts() {
        let metrics = metrics();
        let matcher = Arc::new(FlakyMatcher {
            failures: u32::MAX,
            calls: AtomicU32::new(0),
        });
        let (_tx, shutdown) = broadcast::channel(1);
        let (dispatcher, receiver) = MatchDispatcher::channel(4, metrics.clone());
        dispatcher.enqueue(&item());
        dispatcher.enqueue(&item());
        drop(dispatcher);

        run_worker(receiver, matcher.clone(), fast_policy(3), metrics.clone(), shutdown).await;

        assert_eq!(matcher.calls.load(Ordering::SeqCst), 6);
        assert_eq!(metrics.failed.get(), 2);
        assert_eq!(metrics.succeeded.get(), 0);
    }

    #[tokio::test]
    async fn shutdown_stops_the_worker() {
        let metrics = metrics();
        let (tx, shutdown) = broadcast::channel(1);
        let (dispatcher, handle) = MatchDispatcher::spawn(
            4,
            Arc::new(crate::client::DisabledMatcher),
            fast_policy(1),
            metrics,
            shutdown,
        );
        tx.send(()).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("worker did not stop")
            .unwrap();
        // Later candidates are dropped, never block.
        dispatcher.enqueue(&item());
        assert_eq!(dispatcher.metrics().dropped.get(), 1);
    }
}
