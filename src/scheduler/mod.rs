//! Priority scheduling subsystem.
//!
//! Couples the ordered pending queue with a resizable set of worker threads
//! and a completion registry. The [`Scheduler`] handle owns the workers;
//! workers share the queue, registry, and metrics through one `Arc`.

pub mod task;

mod queue;
mod registry;
mod worker;

pub use registry::TaskStatus;
pub use task::{Priority, Task, TaskId};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::metrics::{Metrics, MetricsSnapshot};
use parking_lot::{Condvar, Mutex};
use queue::PendingQueue;
use registry::CompletionRegistry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use worker::WorkerHandle;

/// State shared between the scheduler handle and every worker thread.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) queue: Mutex<PendingQueue>,
    pub(crate) work_ready: Condvar,
    pub(crate) shutdown: AtomicBool,
    pub(crate) registry: CompletionRegistry,
    pub(crate) metrics: Metrics,
    pub(crate) config: Config,
}

/// Priority-ordered task scheduler over a resizable worker pool.
///
/// Tasks carry a caller-assigned id, a priority (lower value runs first), and
/// a deadline used only to break priority ties. Workers claim tasks one at a
/// time in that order. The pool can be grown and shrunk while tasks are in
/// flight; shrinking retires workers cooperatively after their current task.
///
/// ```
/// use priopool::{Scheduler, Task};
///
/// let pool = Scheduler::with_workers(2)?;
/// pool.submit(Task::new(1, 5, || println!("low priority")));
/// pool.submit(Task::new(2, 1, || println!("high priority")));
/// pool.wait_for(1)?;
/// pool.wait_for(2)?;
/// # Ok::<(), priopool::Error>(())
/// ```
#[derive(Debug)]
pub struct Scheduler {
    shared: Arc<Shared>,
    workers: Vec<WorkerHandle>,
    next_worker_id: usize,
}

impl Scheduler {
    /// Create a scheduler from a configuration.
    ///
    /// Spawns the configured initial worker count. Zero workers is valid;
    /// tasks then queue up until [`increase_workers`](Self::increase_workers)
    /// is called.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let initial = config.initial_workers();

        let shared = Arc::new(Shared {
            queue: Mutex::new(PendingQueue::new()),
            work_ready: Condvar::new(),
            shutdown: AtomicBool::new(false),
            registry: CompletionRegistry::new(),
            metrics: Metrics::new(),
            config,
        });

        let mut scheduler = Self {
            shared,
            workers: Vec::new(),
            next_worker_id: 0,
        };
        scheduler.spawn_workers(initial)?;
        Ok(scheduler)
    }

    /// Create a scheduler with an explicit worker count and default settings.
    pub fn with_workers(count: usize) -> Result<Self> {
        Self::new(Config::builder().num_workers(count).build()?)
    }

    fn spawn_workers(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            let handle = worker::spawn_worker(self.shared.clone(), self.next_worker_id)?;
            self.next_worker_id += 1;
            self.workers.push(handle);
        }
        Ok(())
    }

    /// Submit one task. Never blocks and never rejects.
    ///
    /// The task becomes [`TaskStatus::Pending`] before it is visible to any
    /// worker. Submissions after [`shutdown`](Self::shutdown) are accepted
    /// but no worker remains to claim them.
    pub fn submit(&self, task: Task) {
        let id = task.id();
        self.shared.registry.register(id);
        self.shared.metrics.record_submission();
        {
            let mut queue = self.shared.queue.lock();
            queue.push(task);
        }
        self.shared.work_ready.notify_one();
    }

    /// Submit a batch of tasks under a single queue lock hold.
    ///
    /// Workers never observe a partially inserted batch.
    pub fn submit_batch(&self, tasks: Vec<Task>) {
        if tasks.is_empty() {
            return;
        }
        self.shared.registry.register_all(tasks.iter().map(Task::id));
        {
            let mut queue = self.shared.queue.lock();
            for task in tasks {
                self.shared.metrics.record_submission();
                queue.push(task);
            }
        }
        self.shared.work_ready.notify_all();
    }

    /// Remove a task from the pending queue before any worker claims it.
    ///
    /// Returns `true` if the task was still pending and is now cancelled;
    /// waiters on the id are woken with [`Error::TaskCancelled`]. Returns
    /// `false` if the id is unknown or the task already started.
    pub fn cancel<I: Into<TaskId>>(&self, id: I) -> bool {
        let id = id.into();
        let removed = self.shared.queue.lock().remove(id);
        if removed {
            self.shared.metrics.record_cancellation();
            self.shared.registry.mark_cancelled(id);
        }
        removed
    }

    /// Lifecycle of a task id. [`TaskStatus::Unknown`] for ids never
    /// submitted to this scheduler.
    pub fn status<I: Into<TaskId>>(&self, id: I) -> TaskStatus {
        self.shared.registry.status(id.into())
    }

    /// Block until the task finishes.
    ///
    /// Returns `Ok(())` when the task completed, [`Error::TaskCancelled`] if
    /// it was cancelled, [`Error::TaskPanicked`] if its callable panicked,
    /// and [`Error::UnknownTask`] immediately for an id never submitted.
    pub fn wait_for<I: Into<TaskId>>(&self, id: I) -> Result<()> {
        self.shared.registry.wait(id.into())
    }

    /// Bounded [`wait_for`](Self::wait_for). `Ok(false)` means the task was
    /// still outstanding when the timeout elapsed. Timeouts too large to
    /// represent as a deadline wait without bound.
    pub fn wait_for_timeout<I: Into<TaskId>>(&self, id: I, timeout: Duration) -> Result<bool> {
        self.shared.registry.wait_timeout(id.into(), timeout)
    }

    /// Number of tasks currently waiting in the queue. Advisory; the value
    /// may be stale by the time it is read.
    pub fn pending_count(&self) -> usize {
        self.shared.queue.lock().len()
    }

    /// Number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Spawn `count` additional workers that immediately start competing for
    /// pending tasks.
    pub fn increase_workers(&mut self, count: usize) -> Result<()> {
        if self.shared.shutdown.load(Ordering::Acquire) {
            return Err(Error::pool("scheduler is shut down"));
        }
        self.spawn_workers(count)
    }

    /// Retire up to `count` workers, newest first, and join their threads.
    ///
    /// Retirement is cooperative: a retiring worker finishes its current
    /// task before exiting and never claims another. The call blocks until
    /// every retired thread has exited. Returns the number retired, which is
    /// `count` clamped to the current pool size.
    pub fn decrease_workers(&mut self, count: usize) -> usize {
        let count = count.min(self.workers.len());
        if count == 0 {
            return 0;
        }

        let keep = self.workers.len() - count;
        let mut retired = self.workers.split_off(keep);
        for handle in &retired {
            handle.request_retire();
        }
        // the retire stores must be ordered with the queue lock before the
        // notify; a worker between its predicate checks and wait() would
        // otherwise miss the wakeup and park forever
        drop(self.shared.queue.lock());
        self.shared.work_ready.notify_all();
        for handle in &mut retired {
            handle.join();
        }
        count
    }

    /// Snapshot of the scheduler's counters and latency distribution.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.shared.metrics.snapshot()
    }

    /// Stop the pool: wake every worker, let them drain the queue, and join
    /// them all. Idempotent. Called automatically on drop.
    ///
    /// Workers exit only once the queue is empty, so tasks pending at
    /// shutdown still run, provided at least one worker is live.
    pub fn shutdown(&mut self) {
        if self.shared.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }
        // same discipline as decrease_workers: the lock round-trip keeps
        // the notify from racing a worker into the condvar wait
        drop(self.shared.queue.lock());
        self.shared.work_ready.notify_all();
        for handle in &mut self.workers {
            handle.join();
        }
        self.workers.clear();
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
