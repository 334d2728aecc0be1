//! Error types for the scheduler.

use crate::scheduler::task::TaskId;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),

    /// Worker pool failure, e.g. the OS refused to spawn a thread.
    #[error("pool error: {0}")]
    Pool(String),

    /// A wait or status query referenced an id that was never submitted.
    #[error("task {0} was never submitted")]
    UnknownTask(TaskId),

    /// The awaited task was cancelled before any worker claimed it.
    #[error("task {0} was cancelled")]
    TaskCancelled(TaskId),

    /// The task's callable panicked; the payload was captured.
    #[error("task {id} panicked: {message}")]
    TaskPanicked {
        /// Id of the task that panicked.
        id: TaskId,
        /// Rendered panic payload.
        message: String,
    },
}

impl Error {
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn pool<S: Into<String>>(msg: S) -> Self {
        Error::Pool(msg.into())
    }
}
