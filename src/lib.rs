//! priopool - Priority-Ordered Task Pool
//!
//! A priority-ordered task scheduler backed by a resizable worker-thread
//! pool. Tasks carry a caller-assigned id, an integer priority (lower value
//! runs first), and a deadline used to break priority ties. Workers claim
//! tasks strictly in that order; the pool can be grown and shrunk while work
//! is in flight.
//!
//! # Quick Start
//!
//! ```
//! use priopool::{Scheduler, Task};
//!
//! let mut pool = Scheduler::with_workers(4)?;
//!
//! pool.submit(Task::new(1, 2, || println!("routine work")));
//! pool.submit(Task::new(2, 1, || println!("urgent work")));
//!
//! // Block until a specific task finishes
//! pool.wait_for(2)?;
//!
//! pool.shutdown();
//! # Ok::<(), priopool::Error>(())
//! ```
//!
//! # Features
//!
//! - **Priority Ordering**: lower priority value wins; earlier deadline
//!   breaks ties
//! - **Elastic Pool**: grow and shrink the worker set at runtime; shrinking
//!   retires workers cooperatively after their current task
//! - **Completion Tracking**: per-task status, blocking and bounded waits
//! - **Cancellation**: remove a task before any worker claims it
//! - **Panic Isolation**: a panicking task is recorded and surfaced to
//!   waiters without killing its worker
//! - **Telemetry**: counters and latency percentiles (optional)

// Lint configuration
#![warn(missing_docs, missing_debug_implementations)]
#![allow(dead_code)] // During development

// Core modules - always available
pub mod config;
pub mod error;
pub mod prelude;
pub mod scheduler;

#[cfg(feature = "telemetry")]
pub mod metrics;

// Stub implementations when telemetry is disabled
#[cfg(not(feature = "telemetry"))]
pub mod metrics {
    use std::time::Instant;

    #[derive(Debug, Clone)]
    pub struct Metrics;

    impl Metrics {
        pub fn new() -> Self {
            Self
        }
        pub fn record_submission(&self) {}
        pub fn record_task_execution(&self, _: u64) {}
        pub fn record_cancellation(&self) {}
        pub fn record_task_panic(&self) {}
        pub fn snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot::default()
        }
        pub fn reset(&self) {}
    }

    #[derive(Debug, Clone, Default)]
    pub struct MetricsSnapshot {
        pub timestamp: Option<Instant>,
        pub tasks_submitted: u64,
        pub tasks_executed: u64,
        pub tasks_cancelled: u64,
        pub tasks_panicked: u64,
        pub avg_latency_ns: u64,
        pub p50_latency_ns: u64,
        pub p99_latency_ns: u64,
    }
}

// Re-export key types at crate root
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use scheduler::{Priority, Scheduler, Task, TaskId, TaskStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_basic_submit_wait() {
        let pool = Scheduler::with_workers(2).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        for id in 1..=10_u64 {
            let hits = hits.clone();
            pool.submit(Task::new(id, (id % 3) as i32, move || {
                hits.fetch_add(1, Ordering::SeqCst);
            }));
        }
        for id in 1..=10_u64 {
            pool.wait_for(id).unwrap();
        }

        assert_eq!(hits.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_batch_submit() {
        let pool = Scheduler::with_workers(2).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<Task> = (1..=5_u64)
            .map(|id| {
                let hits = hits.clone();
                Task::new(id, 0, move || {
                    hits.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();
        pool.submit_batch(tasks);

        for id in 1..=5_u64 {
            pool.wait_for(id).unwrap();
        }
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let pool = Scheduler::new(Config::builder().num_workers(1).build().unwrap()).unwrap();
        pool.submit(Task::new(1, 0, || {}));
        assert!(pool.wait_for(1).is_ok());
        assert_eq!(pool.status(1), TaskStatus::Completed);
    }
}
