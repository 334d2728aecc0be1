//! Worker threads.
//!
//! Each worker parks on the shared queue condvar and wakes for one of three
//! reasons: a task is available, the scheduler is shutting down, or this
//! particular worker was asked to retire. Retirement is cooperative: the
//! flag is only checked between tasks, so a running task always finishes
//! before its thread exits.

use super::Shared;
use crate::error::{Error, Result};
use crate::scheduler::task::Task;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Owning handle to one worker thread.
#[derive(Debug)]
pub(crate) struct WorkerHandle {
    id: usize,
    retire: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Ask the worker to exit after its current task. To take effect the
    /// caller must lock and release the queue mutex and then wake the queue
    /// condvar; the flag alone does not interrupt a parked worker.
    pub fn request_retire(&self) {
        self.retire.store(true, Ordering::Release);
    }

    /// Block until the worker thread has exited.
    pub fn join(&mut self) {
        if let Some(handle) = self.thread.take() {
            // a worker that panicked outside a task already tore itself down
            let _ = handle.join();
        }
    }
}

pub(crate) fn spawn_worker(shared: Arc<Shared>, id: usize) -> Result<WorkerHandle> {
    let retire = Arc::new(AtomicBool::new(false));
    let thread_retire = retire.clone();

    let mut builder =
        thread::Builder::new().name(format!("{}-{}", shared.config.thread_name_prefix, id));
    if let Some(stack_size) = shared.config.stack_size {
        builder = builder.stack_size(stack_size);
    }

    let thread = builder
        .spawn(move || run(shared, id, thread_retire))
        .map_err(|e| Error::pool(format!("failed to spawn worker {}: {}", id, e)))?;

    Ok(WorkerHandle {
        id,
        retire,
        thread: Some(thread),
    })
}

/// Main worker loop.
fn run(shared: Arc<Shared>, worker_id: usize, retire: Arc<AtomicBool>) {
    loop {
        let task = {
            let mut queue = shared.queue.lock();
            loop {
                if retire.load(Ordering::Acquire) {
                    return;
                }
                // shutdown drains the queue before the thread exits
                if shared.shutdown.load(Ordering::Acquire) && queue.is_empty() {
                    return;
                }
                if let Some(task) = queue.pop() {
                    break task;
                }
                shared.work_ready.wait(&mut queue);
            }
        };

        execute(&shared, worker_id, task);
    }
}

/// Run one task, capturing panics so the worker thread survives.
fn execute(shared: &Shared, worker_id: usize, task: Task) {
    let id = task.id();
    shared.registry.mark_running(id);

    let start = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| task.run()));

    match result {
        Ok(()) => {
            shared
                .metrics
                .record_task_execution(start.elapsed().as_nanos() as u64);
            shared.registry.mark_completed(id);
        }
        Err(payload) => {
            let message = panic_message(&payload);
            if cfg!(debug_assertions) {
                eprintln!(
                    "[priopool] worker {}: task {} panicked: {}",
                    worker_id, id, message
                );
            }
            shared.metrics.record_task_panic();
            shared.registry.mark_panicked(id, message);
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
