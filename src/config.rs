use crate::error::{Error, Result};

/// Scheduler configuration.
///
/// Build one with [`Config::builder`]; every field has a sensible default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of workers started at construction. `None` uses the machine's
    /// logical CPU count. An explicit `0` is valid: the pool starts empty
    /// and can be grown later with `increase_workers`.
    pub num_workers: Option<usize>,

    /// Prefix for worker thread names; workers are named `"{prefix}-{id}"`.
    pub thread_name_prefix: String,

    /// Stack size for worker threads, in bytes.
    pub stack_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_workers: None,
            thread_name_prefix: "priopool-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
        }
    }
}

impl Config {
    /// Start building a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Check the configuration for nonsensical values.
    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.num_workers {
            if n > 1024 {
                return Err(Error::config("num_workers too large (max 1024)"));
            }
        }

        if self.thread_name_prefix.is_empty() {
            return Err(Error::config("thread_name_prefix must not be empty"));
        }

        Ok(())
    }

    /// Worker count to start with: the configured value, or the number of
    /// logical CPUs when unset.
    pub fn initial_workers(&self) -> usize {
        self.num_workers.unwrap_or_else(num_cpus::get)
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder seeded with defaults.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the initial worker count. `0` starts an empty pool.
    pub fn num_workers(mut self, n: usize) -> Self {
        self.config.num_workers = Some(n);
        self
    }

    /// Set the worker thread name prefix.
    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Set the worker thread stack size in bytes.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
