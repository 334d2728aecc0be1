//! Convenient re-exports for common usage.

pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Error, Result};
pub use crate::scheduler::{Priority, Scheduler, Task, TaskId, TaskStatus};

#[cfg(feature = "telemetry")]
pub use crate::metrics::{Metrics, MetricsSnapshot};
