//! Task scheduler and concurrency controller
//!
//! Folder tasks fan out recursively: reconciling one folder dispatches a
//! task per subfolder and per file needing upload. All tasks flow through a
//! single queue; the scheduler bounds how many run at once and owns the one
//! synchronization point that says "the whole transitive task set is done".
//!
//! Two configuration-equivalent models:
//!
//! - [`ConcurrencyModel::WorkerPool`] (the default): a fixed pool of
//!   workers consumes the queue. A task never blocks waiting on its own
//!   children - children go back through the queue - so the pool cannot
//!   deadlock even when the tree is deeper or wider than the pool.
//! - [`ConcurrencyModel::Unbounded`]: every queued task is spawned onto the
//!   runtime immediately. Fine for small trees; large ones can fan out into
//!   an unbounded number of concurrent remote calls.
//!
//! Completion is detected by an outstanding-task counter: incremented on
//! submit, decremented after a task finishes running. Since a running
//! parent submits its children before its own decrement, the counter can
//! only reach zero once the queue is empty and nothing is in flight.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use foliosync_core::config::SyncConfig;
use tokio::sync::{mpsc, Mutex, Notify};
use tracing::{debug, info, warn};

use crate::engine::SyncContext;
use crate::tasks::{FolderSyncTask, Task};

/// How the recursive task fan-out is bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConcurrencyModel {
    /// Fixed-size pool consuming one global queue (production default).
    WorkerPool {
        /// Number of concurrent workers
        workers: usize,
    },
    /// Spawn every task immediately; no bound on concurrency.
    Unbounded,
}

impl ConcurrencyModel {
    /// Derives the model from configuration.
    ///
    /// `sync.model = "unbounded"` selects unbounded fan-out; anything else
    /// (validation allows only `"worker_pool"`) selects the pool, clamped
    /// to at least one worker.
    pub fn from_config(sync: &SyncConfig) -> Self {
        if sync.model == "unbounded" {
            Self::Unbounded
        } else {
            Self::WorkerPool {
                workers: sync.workers.max(1),
            }
        }
    }
}

// ============================================================================
// Scheduler handle
// ============================================================================

#[derive(Debug)]
struct SchedulerInner {
    /// Sending half of the task queue; taken on shutdown so workers see
    /// the channel close once the queue drains
    tx: StdMutex<Option<mpsc::UnboundedSender<Task>>>,
    /// Tasks submitted but not yet finished running
    outstanding: AtomicUsize,
    /// Signalled whenever `outstanding` drops to zero
    idle: Notify,
}

/// Clonable handle for submitting tasks and tracking quiescence.
///
/// Tasks receive a reference to the scheduler so they can dispatch their
/// children; they never wait on those children themselves.
#[derive(Debug, Clone)]
pub(crate) struct Scheduler {
    inner: Arc<SchedulerInner>,
}

impl Scheduler {
    fn new() -> (Self, mpsc::UnboundedReceiver<Task>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            inner: Arc::new(SchedulerInner {
                tx: StdMutex::new(Some(tx)),
                outstanding: AtomicUsize::new(0),
                idle: Notify::new(),
            }),
        };
        (scheduler, rx)
    }

    /// Enqueues a task. Submissions after shutdown are dropped (none occur
    /// during a well-formed run: shutdown happens only at quiescence).
    pub(crate) fn submit(&self, task: Task) {
        let guard = self.inner.tx.lock().expect("scheduler lock poisoned");
        match guard.as_ref() {
            Some(tx) => {
                self.inner.outstanding.fetch_add(1, Ordering::SeqCst);
                if tx.send(task).is_err() {
                    warn!("Task queue closed; dropping task");
                    self.mark_done();
                }
            }
            None => warn!("Scheduler already shut down; dropping task"),
        }
    }

    /// Records a finished task, waking the idle waiter on the last one.
    fn mark_done(&self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.idle.notify_waiters();
        }
    }

    /// Waits until no submitted task remains outstanding.
    async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            if self.inner.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Drops the queue's sending half so consumers terminate.
    fn shutdown(&self) {
        self.inner.tx.lock().expect("scheduler lock poisoned").take();
    }
}

// ============================================================================
// Run loop
// ============================================================================

/// Runs `root` and its entire transitive task set to completion.
pub(crate) async fn run(ctx: Arc<SyncContext>, model: &ConcurrencyModel, root: FolderSyncTask) {
    let (scheduler, rx) = Scheduler::new();
    scheduler.submit(Task::Folder(root));

    match model {
        ConcurrencyModel::WorkerPool { workers } => {
            info!(workers, "Starting sync worker pool");
            let rx = Arc::new(Mutex::new(rx));

            let handles: Vec<_> = (0..*workers)
                .map(|worker| {
                    let rx = rx.clone();
                    let ctx = ctx.clone();
                    let scheduler = scheduler.clone();
                    tokio::spawn(async move {
                        worker_loop(worker, rx, ctx, scheduler).await;
                    })
                })
                .collect();

            scheduler.wait_idle().await;
            scheduler.shutdown();

            for handle in handles {
                if let Err(err) = handle.await {
                    warn!(error = %err, "Sync worker panicked");
                }
            }
        }
        ConcurrencyModel::Unbounded => {
            info!("Starting unbounded sync fan-out");
            let dispatch_ctx = ctx.clone();
            let dispatch_scheduler = scheduler.clone();
            let dispatcher = tokio::spawn(async move {
                let mut rx = rx;
                while let Some(task) = rx.recv().await {
                    let ctx = dispatch_ctx.clone();
                    let scheduler = dispatch_scheduler.clone();
                    tokio::spawn(async move {
                        task.run(&ctx, &scheduler).await;
                        scheduler.mark_done();
                    });
                }
            });

            scheduler.wait_idle().await;
            scheduler.shutdown();

            if let Err(err) = dispatcher.await {
                warn!(error = %err, "Task dispatcher panicked");
            }
        }
    }

    debug!("Task queue quiescent");
}

/// One worker: pull a task, run it, repeat until the queue closes.
///
/// The receiver lock is held only across the `recv` itself, so up to N
/// tasks execute concurrently while a single worker at a time waits for
/// the next one.
async fn worker_loop(
    worker: usize,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<Task>>>,
    ctx: Arc<SyncContext>,
    scheduler: Scheduler,
) {
    loop {
        let task = {
            let mut guard = rx.lock().await;
            guard.recv().await
        };
        match task {
            Some(task) => {
                task.run(&ctx, &scheduler).await;
                scheduler.mark_done();
            }
            None => {
                debug!(worker, "Worker shutting down");
                return;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
