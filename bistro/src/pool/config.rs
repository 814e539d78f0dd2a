//! Pool sizing and timing.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default ceiling on open connections.
pub const DEFAULT_MAX_SIZE: usize = 8;
/// Default number of idle connections kept for reuse.
pub const DEFAULT_MAX_IDLE: usize = 8;
/// Default time an idle connection may sit unused before it is closed.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(300);
/// Default interval between background eviction passes.
pub const DEFAULT_REAP_INTERVAL: Duration = Duration::from_secs(30);
/// Default time `acquire` waits for a connection to be released.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Configuration for a [`ConnectionPool`](super::ConnectionPool).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bistro::pool::PoolConfig;
///
/// let config = PoolConfig::default()
///     .with_max_size(4)
///     .with_acquire_timeout(Duration::from_millis(250))
///     .without_reaper();
/// assert_eq!(config.max_size, 4);
/// assert!(config.reap_interval.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Most connections open at once, loaned plus idle.
    pub max_size: usize,
    /// Most idle connections kept; extras are closed on release.
    pub max_idle: usize,
    /// Idle connections unused for this long are evicted.
    pub idle_timeout: Duration,
    /// How often the reaper runs; `None` disables it.
    pub reap_interval: Option<Duration>,
    /// How long `acquire` waits when every connection is on loan.
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_idle: DEFAULT_MAX_IDLE,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            reap_interval: Some(DEFAULT_REAP_INTERVAL),
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl PoolConfig {
    /// Sets the connection ceiling.
    #[must_use]
    pub const fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Sets the idle set capacity.
    #[must_use]
    pub const fn with_max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Sets the idle eviction threshold.
    #[must_use]
    pub const fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Sets the reaper interval.
    #[must_use]
    pub const fn with_reap_interval(mut self, interval: Duration) -> Self {
        self.reap_interval = Some(interval);
        self
    }

    /// Disables the background reaper.
    #[must_use]
    pub const fn without_reaper(mut self) -> Self {
        self.reap_interval = None;
        self
    }

    /// Sets how long `acquire` may wait.
    #[must_use]
    pub const fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Checks the settings are usable.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero ceiling or a zero reap interval.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(Error::Validation {
                field: "pool.max_size".into(),
                message: "pool must allow at least one connection".into(),
            });
        }
        if self.reap_interval == Some(Duration::ZERO) {
            return Err(Error::Validation {
                field: "pool.reap_interval".into(),
                message: "reap interval must be positive".into(),
            });
        }
        Ok(())
    }
}
