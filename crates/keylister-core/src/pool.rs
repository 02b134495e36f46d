use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::aggregate::Aggregator;
use crate::cancel::CancelSignal;
use crate::error::{KeyListerError, Result};
use crate::paginate::{collect_pages, Pagination};
use crate::types::{Report, WorkItem, WorkOutcome};

/// Closed, pre-filled queue shared by every worker. Each `recv` hands an
/// item to exactly one worker.
type WorkQueue = Arc<Mutex<mpsc::UnboundedReceiver<WorkItem>>>;

/// Fixed-size pool of tasks listing access keys, one user at a time.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: usize,
    cancel: CancelSignal,
}

impl WorkerPool {
    pub fn new(workers: usize, cancel: CancelSignal) -> Result<Self> {
        if workers == 0 {
            return Err(KeyListerError::Config(
                "worker count must be at least 1".into(),
            ));
        }
        Ok(Self { workers, cancel })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// List access keys for every item and aggregate the outcomes.
    ///
    /// At most `workers` key listings are in flight at once. The queue is
    /// filled and closed before any worker starts.
    pub async fn run(&self, items: Vec<WorkItem>) -> Result<Report> {
        let expected = items.len();

        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        for item in items {
            queue_tx
                .send(item)
                .map_err(|_| KeyListerError::Worker("work queue closed early".into()))?;
        }
        drop(queue_tx);
        let queue: WorkQueue = Arc::new(Mutex::new(queue_rx));

        let (outcome_tx, outcome_rx) = mpsc::channel(self.workers);
        let mut tasks = JoinSet::new();
        for worker_id in 1..=self.workers {
            tasks.spawn(worker(
                worker_id,
                Arc::clone(&queue),
                outcome_tx.clone(),
                self.cancel.clone(),
            ));
        }
        // Only workers hold senders now, so the channel closes when they all exit.
        drop(outcome_tx);

        info!(users = expected, workers = self.workers, "listing access keys");
        let collected = Aggregator::new(expected)
            .collect(outcome_rx, &self.cancel)
            .await;
        let joined = join_workers(&mut tasks).await;

        match (collected, joined) {
            (Ok(report), Ok(())) => Ok(report),
            // A panicked worker is the reason the stream came up short.
            (Err(KeyListerError::Incomplete { .. }), Err(worker)) => Err(worker),
            (Err(err), _) => Err(err),
            (Ok(_), Err(worker)) => Err(worker),
        }
    }
}

async fn worker(
    worker_id: usize,
    queue: WorkQueue,
    outcomes: mpsc::Sender<Result<WorkOutcome>>,
    cancel: CancelSignal,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }
        let Some(item) = queue.lock().await.recv().await else {
            break;
        };

        debug!(
            worker_id,
            account_id = %item.account_id,
            user_name = %item.user_name,
            "listing access keys for user"
        );
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            outcome = fetch_outcome(&item) => outcome,
        };

        let failed = outcome.is_err();
        if let Ok(WorkOutcome::Found { keys, .. }) = &outcome {
            debug!(worker_id, user_name = %item.user_name, keys = keys.len(), "access keys found");
        }
        if outcomes.send(outcome).await.is_err() || failed {
            break;
        }
    }
    debug!(worker_id, "worker exiting");
}

/// List one user's access keys and classify the result.
///
/// An empty first page means `Empty` without requesting more pages.
pub async fn fetch_outcome(item: &WorkItem) -> Result<WorkOutcome> {
    let directory = item.session.directory();
    let keys = collect_pages(Pagination::StopOnEmptyPage, |marker| {
        directory.list_access_keys(&item.user_name, marker)
    })
    .await
    .map_err(|source| KeyListerError::ListAccessKeys {
        account_id: item.account_id.clone(),
        user_name: item.user_name.clone(),
        source,
    })?;
    Ok(WorkOutcome::classify(item, keys))
}

async fn join_workers(tasks: &mut JoinSet<()>) -> Result<()> {
    let mut failure = None;
    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            failure.get_or_insert(KeyListerError::Worker(err.to_string()));
        }
    }
    failure.map_or(Ok(()), Err)
}
