//! Per-task completion tracking.
//!
//! Every submitted task id owns a completion slot: a small state machine
//! (`Pending → Running → Completed | Panicked`, or `Pending → Cancelled`)
//! behind its own mutex, paired with a condvar so waiters are woken the
//! moment the task reaches a terminal state. Terminal states are sticky.

use super::task::TaskId;
use crate::error::{Error, Result};
use parking_lot::{Condvar, Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Lifecycle of a task id as seen by status queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Submitted and waiting in the queue.
    Pending,
    /// Claimed by a worker and currently executing.
    Running,
    /// The callable returned normally.
    Completed,
    /// Removed from the queue before any worker claimed it.
    Cancelled,
    /// The callable panicked; the payload was captured.
    Panicked,
    /// The id was never submitted to this scheduler.
    Unknown,
}

#[derive(Debug)]
enum SlotState {
    Pending,
    Running,
    Completed,
    Cancelled,
    Panicked(String),
}

impl SlotState {
    fn is_terminal(&self) -> bool {
        !matches!(self, SlotState::Pending | SlotState::Running)
    }
}

/// One-shot completion signal for a single task id.
#[derive(Debug)]
struct CompletionSlot {
    state: Mutex<SlotState>,
    done: Condvar,
}

impl CompletionSlot {
    fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Pending),
            done: Condvar::new(),
        }
    }

    fn set_running(&self) {
        let mut state = self.state.lock();
        if matches!(*state, SlotState::Pending) {
            *state = SlotState::Running;
        }
    }

    /// Move to a terminal state and wake every waiter. Terminal states never
    /// revert, so a second call is a no-op.
    fn finish(&self, next: SlotState) {
        let mut state = self.state.lock();
        if state.is_terminal() {
            return;
        }
        *state = next;
        drop(state);
        self.done.notify_all();
    }

    fn status(&self) -> TaskStatus {
        match &*self.state.lock() {
            SlotState::Pending => TaskStatus::Pending,
            SlotState::Running => TaskStatus::Running,
            SlotState::Completed => TaskStatus::Completed,
            SlotState::Cancelled => TaskStatus::Cancelled,
            SlotState::Panicked(_) => TaskStatus::Panicked,
        }
    }
}

fn terminal_result(id: TaskId, state: &SlotState) -> Result<()> {
    match state {
        SlotState::Completed => Ok(()),
        SlotState::Cancelled => Err(Error::TaskCancelled(id)),
        SlotState::Panicked(message) => Err(Error::TaskPanicked {
            id,
            message: message.clone(),
        }),
        SlotState::Pending | SlotState::Running => unreachable!("non-terminal state"),
    }
}

fn wait_terminal(slot: &CompletionSlot, id: TaskId) -> Result<()> {
    let mut state = slot.state.lock();
    while !state.is_terminal() {
        slot.done.wait(&mut state);
    }
    terminal_result(id, &state)
}

/// Registry of completion slots, keyed by task id.
///
/// Entries persist for the scheduler's lifetime. Registering an id that
/// already finished installs a fresh slot, so ids may be reused once the
/// previous task with that id is done.
#[derive(Debug, Default)]
pub(crate) struct CompletionRegistry {
    slots: RwLock<HashMap<TaskId, Arc<CompletionSlot>>>,
}

impl CompletionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh Pending slot for the id.
    pub fn register(&self, id: TaskId) {
        self.slots.write().insert(id, Arc::new(CompletionSlot::new()));
    }

    /// Install fresh Pending slots for a whole batch under one lock hold.
    pub fn register_all<I>(&self, ids: I)
    where
        I: IntoIterator<Item = TaskId>,
    {
        let mut slots = self.slots.write();
        for id in ids {
            slots.insert(id, Arc::new(CompletionSlot::new()));
        }
    }

    fn slot(&self, id: TaskId) -> Option<Arc<CompletionSlot>> {
        self.slots.read().get(&id).cloned()
    }

    pub fn mark_running(&self, id: TaskId) {
        if let Some(slot) = self.slot(id) {
            slot.set_running();
        }
    }

    pub fn mark_completed(&self, id: TaskId) {
        if let Some(slot) = self.slot(id) {
            slot.finish(SlotState::Completed);
        }
    }

    pub fn mark_cancelled(&self, id: TaskId) {
        if let Some(slot) = self.slot(id) {
            slot.finish(SlotState::Cancelled);
        }
    }

    pub fn mark_panicked(&self, id: TaskId, message: String) {
        if let Some(slot) = self.slot(id) {
            slot.finish(SlotState::Panicked(message));
        }
    }

    pub fn status(&self, id: TaskId) -> TaskStatus {
        match self.slot(id) {
            Some(slot) => slot.status(),
            None => TaskStatus::Unknown,
        }
    }

    /// Block until the task reaches a terminal state.
    ///
    /// Fails fast with [`Error::UnknownTask`] for an id that was never
    /// submitted, instead of waiting on an entry that can never complete.
    pub fn wait(&self, id: TaskId) -> Result<()> {
        let slot = self.slot(id).ok_or(Error::UnknownTask(id))?;
        wait_terminal(&slot, id)
    }

    /// Bounded wait. `Ok(true)` means the task completed; `Ok(false)` means
    /// it was still outstanding when the timeout elapsed. A timeout too
    /// large to represent as a deadline waits without bound.
    pub fn wait_timeout(&self, id: TaskId, timeout: Duration) -> Result<bool> {
        let slot = self.slot(id).ok_or(Error::UnknownTask(id))?;
        let deadline = match Instant::now().checked_add(timeout) {
            Some(deadline) => deadline,
            None => return wait_terminal(&slot, id).map(|()| true),
        };
        let mut state = slot.state.lock();
        while !state.is_terminal() {
            if slot.done.wait_until(&mut state, deadline).timed_out() {
                // the state may have flipped right at the deadline
                if state.is_terminal() {
                    break;
                }
                return Ok(false);
            }
        }
        terminal_result(id, &state).map(|()| true)
    }
}
