//! Task representation.

use std::fmt;
use std::time::Instant;

/// Priority of a task. Lower values run first; the range is entirely up to
/// the caller.
pub type Priority = i32;

/// Caller-assigned task identifier.
///
/// Uniqueness among concurrently tracked tasks is the caller's obligation;
/// the scheduler does not detect duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl From<u64> for TaskId {
    fn from(id: u64) -> Self {
        TaskId(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit of work: identity, ordering fields, and an opaque callable.
///
/// The scheduler never inspects the callable; its only contract is "invoke
/// once with no arguments". Whether it is pure or terminates quickly is the
/// caller's business.
pub struct Task {
    pub(crate) id: TaskId,
    pub(crate) priority: Priority,
    pub(crate) deadline: Instant,
    pub(crate) func: Box<dyn FnOnce() + Send + 'static>,
}

impl Task {
    /// Create a task. The deadline defaults to the submission instant, so
    /// among equal priorities earlier-created tasks win the tie-break.
    pub fn new<I, F>(id: I, priority: Priority, f: F) -> Self
    where
        I: Into<TaskId>,
        F: FnOnce() + Send + 'static,
    {
        Task {
            id: id.into(),
            priority,
            deadline: Instant::now(),
            func: Box::new(f),
        }
    }

    /// Override the tie-break deadline. Deadlines are never enforced as
    /// timeouts; they only order tasks of equal priority.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = deadline;
        self
    }

    /// The caller-assigned id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// The task's priority (lower runs first).
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The tie-break deadline.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Consume the task and invoke its callable.
    pub(crate) fn run(self) {
        (self.func)();
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("deadline", &self.deadline)
            .finish()
    }
}
