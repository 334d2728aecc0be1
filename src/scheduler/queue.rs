use super::task::{Task, TaskId};
use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;

/// Pending task wrapped for heap ordering.
///
/// `BinaryHeap` is a max-heap, so the comparison is inverted: the entry that
/// compares greatest is the one with the lowest (priority, deadline) pair.
/// Equal priority and equal deadline compare equal; their relative order is
/// unspecified.
#[derive(Debug)]
struct QueuedTask(Task);

impl PartialEq for QueuedTask {
    fn eq(&self, other: &Self) -> bool {
        self.0.priority == other.0.priority && self.0.deadline == other.0.deadline
    }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other
            .0
            .priority
            .cmp(&self.0.priority)
            .then_with(|| other.0.deadline.cmp(&self.0.deadline))
    }
}

/// The pending set: every submitted, not-yet-claimed task in execution
/// order. Not internally synchronized; the scheduler holds its queue lock
/// around every call.
#[derive(Debug, Default)]
pub(crate) struct PendingQueue {
    heap: BinaryHeap<QueuedTask>,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, task: Task) {
        self.heap.push(QueuedTask(task));
    }

    /// Remove and return the task that runs next.
    pub fn pop(&mut self) -> Option<Task> {
        self.heap.pop().map(|qt| qt.0)
    }

    /// Remove every pending entry with the given id. Full scan and rebuild;
    /// cancellation is not a hot path.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let mut found = false;
        let drained = std::mem::take(&mut self.heap);
        self.heap = drained
            .into_iter()
            .filter(|qt| {
                if qt.0.id == id {
                    found = true;
                    false
                } else {
                    true
                }
            })
            .collect();
        found
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
