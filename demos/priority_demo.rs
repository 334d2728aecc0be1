//! Priority scheduling walkthrough
//!
//! Six tasks with distinct priorities and deadlines on a four-worker pool:
//! wait on specific ids, grow and shrink the pool while work is queued,
//! then attempt a cancellation.

use priopool::prelude::*;
use std::time::{Duration, Instant};

fn work(id: u64, millis: u64) -> impl FnOnce() + Send + 'static {
    move || {
        println!("[task {}] starting", id);
        std::thread::sleep(Duration::from_millis(millis));
        println!("[task {}] complete", id);
    }
}

fn main() {
    println!("=== Priority Pool Example ===\n");

    let mut pool = Scheduler::with_workers(4).expect("Failed to create scheduler");
    let now = Instant::now();

    println!("Submitting six tasks...");
    pool.submit_batch(vec![
        Task::new(1, 1, work(1, 120)).with_deadline(now + Duration::from_secs(2)),
        Task::new(2, 3, work(2, 80)).with_deadline(now + Duration::from_secs(4)),
        Task::new(3, 5, work(3, 60)).with_deadline(now + Duration::from_secs(6)),
        Task::new(4, 2, work(4, 100)).with_deadline(now + Duration::from_secs(1)),
        Task::new(5, 4, work(5, 90)).with_deadline(now + Duration::from_secs(3)),
        Task::new(6, 6, work(6, 50)).with_deadline(now + Duration::from_secs(5)),
    ]);
    println!("Tasks in queue: {}", pool.pending_count());

    println!("\nWaiting for task 4...");
    pool.wait_for(4).expect("task 4 failed");
    println!("Task 4 done (status: {:?})", pool.status(4));

    println!("\nWaiting for task 1...");
    pool.wait_for(1).expect("task 1 failed");
    println!("Task 1 done");

    println!("\nGrowing the pool by 2 workers...");
    pool.increase_workers(2).expect("failed to grow pool");
    println!("Workers: {}", pool.worker_count());

    println!("Retiring 1 worker...");
    let retired = pool.decrease_workers(1);
    println!("Retired {} worker, {} remain", retired, pool.worker_count());

    // Cancellation only wins while the task is still queued
    pool.submit(Task::new(7, 9, work(7, 10)));
    if pool.cancel(7) {
        println!("\nTask 7 cancelled before it ran");
    } else {
        println!("\nTask 7 already claimed; letting it finish");
        let _ = pool.wait_for(7);
    }

    for id in [2_u64, 3, 5, 6] {
        pool.wait_for(id).expect("task failed");
    }
    println!("\nAll tasks completed!");

    #[cfg(feature = "telemetry")]
    {
        let snapshot = pool.metrics();
        println!(
            "\nExecuted {} of {} submitted ({} cancelled), p99 latency {} ns",
            snapshot.tasks_executed,
            snapshot.tasks_submitted,
            snapshot.tasks_cancelled,
            snapshot.p99_latency_ns
        );
    }

    pool.shutdown();
    println!("\n=== Example Complete ===");
}
