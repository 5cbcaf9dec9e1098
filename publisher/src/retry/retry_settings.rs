use crate::constants::{
    DEFAULT_INITIAL_RETRY_DELAY, DEFAULT_MAX_RETRY_DELAY, DEFAULT_MAX_RPC_TIMEOUT,
    DEFAULT_RETRY_DELAY_MULTIPLIER, DEFAULT_RPC_TIMEOUT, DEFAULT_RPC_TIMEOUT_MULTIPLIER,
    DEFAULT_TOTAL_TIMEOUT, MIN_RPC_TIMEOUT, MIN_TOTAL_TIMEOUT,
};
use crate::errors::ConfigError;
use std::time::Duration;

/// Governs how a failing batch is retried.
///
/// Retryable failures are retried after an exponentially growing delay until the batch succeeds,
/// fails with a non-retryable error, or the `total_timeout` budget (measured from the first
/// attempt) runs out. Each attempt is also bounded by its own timeout, which grows the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrySettings {
    pub(crate) total_timeout: Duration,
    pub(crate) initial_retry_delay: Duration,
    pub(crate) retry_delay_multiplier: f64,
    pub(crate) max_retry_delay: Duration,
    pub(crate) initial_rpc_timeout: Duration,
    pub(crate) rpc_timeout_multiplier: f64,
    pub(crate) max_rpc_timeout: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            total_timeout: DEFAULT_TOTAL_TIMEOUT,
            initial_retry_delay: DEFAULT_INITIAL_RETRY_DELAY,
            retry_delay_multiplier: DEFAULT_RETRY_DELAY_MULTIPLIER,
            max_retry_delay: DEFAULT_MAX_RETRY_DELAY,
            initial_rpc_timeout: DEFAULT_RPC_TIMEOUT,
            rpc_timeout_multiplier: DEFAULT_RPC_TIMEOUT_MULTIPLIER,
            max_rpc_timeout: DEFAULT_MAX_RPC_TIMEOUT,
        }
    }
}

impl RetrySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_total_timeout(mut self, timeout: Duration) -> Self {
        self.total_timeout = timeout;
        self
    }

    pub fn with_initial_retry_delay(mut self, delay: Duration) -> Self {
        self.initial_retry_delay = delay;
        self
    }

    pub fn with_retry_delay_multiplier(mut self, multiplier: f64) -> Self {
        self.retry_delay_multiplier = multiplier;
        self
    }

    pub fn with_max_retry_delay(mut self, delay: Duration) -> Self {
        self.max_retry_delay = delay;
        self
    }

    pub fn with_initial_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.initial_rpc_timeout = timeout;
        self
    }

    pub fn with_rpc_timeout_multiplier(mut self, multiplier: f64) -> Self {
        self.rpc_timeout_multiplier = multiplier;
        self
    }

    pub fn with_max_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.max_rpc_timeout = timeout;
        self
    }

    pub fn total_timeout(&self) -> Duration {
        self.total_timeout
    }

    pub fn initial_retry_delay(&self) -> Duration {
        self.initial_retry_delay
    }

    pub fn retry_delay_multiplier(&self) -> f64 {
        self.retry_delay_multiplier
    }

    pub fn max_retry_delay(&self) -> Duration {
        self.max_retry_delay
    }

    pub fn initial_rpc_timeout(&self) -> Duration {
        self.initial_rpc_timeout
    }

    /// The delays slept before the second, third, ... attempts.
    pub fn retry_delays(&self) -> Backoff {
        Backoff::new(
            self.initial_retry_delay,
            self.retry_delay_multiplier,
            self.max_retry_delay,
        )
    }

    /// The timeouts applied to the first, second, ... attempts.
    pub fn rpc_timeouts(&self) -> Backoff {
        Backoff::new(
            self.initial_rpc_timeout,
            self.rpc_timeout_multiplier,
            self.max_rpc_timeout,
        )
    }

    /// # Errors
    ///
    /// Returns the first [ConfigError] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_timeout < MIN_TOTAL_TIMEOUT {
            return Err(ConfigError::TotalTimeoutTooShort(
                self.total_timeout,
                MIN_TOTAL_TIMEOUT,
            ));
        }

        if self.initial_rpc_timeout < MIN_RPC_TIMEOUT {
            return Err(ConfigError::RpcTimeoutTooShort(
                self.initial_rpc_timeout,
                MIN_RPC_TIMEOUT,
            ));
        }

        if self.total_timeout <= self.initial_rpc_timeout {
            return Err(ConfigError::TotalTimeoutNotAboveRpcTimeout {
                total: self.total_timeout,
                rpc: self.initial_rpc_timeout,
            });
        }

        if !is_valid_multiplier(self.retry_delay_multiplier) {
            return Err(ConfigError::InvalidRetryDelayMultiplier(
                self.retry_delay_multiplier,
            ));
        }

        if !is_valid_multiplier(self.rpc_timeout_multiplier) {
            return Err(ConfigError::InvalidRpcTimeoutMultiplier(
                self.rpc_timeout_multiplier,
            ));
        }

        if self.max_retry_delay < self.initial_retry_delay {
            return Err(ConfigError::MaxRetryDelayBelowInitial {
                initial: self.initial_retry_delay,
                max: self.max_retry_delay,
            });
        }

        if self.max_rpc_timeout < self.initial_rpc_timeout {
            return Err(ConfigError::MaxRpcTimeoutBelowInitial {
                initial: self.initial_rpc_timeout,
                max: self.max_rpc_timeout,
            });
        }

        Ok(())
    }
}

fn is_valid_multiplier(multiplier: f64) -> bool {
    multiplier.is_finite() && multiplier >= 1.0
}

/// An endless iterator of exponentially growing, capped durations.
///
/// The nth value is `min(initial * multiplier^(n-1), max)`.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    multiplier: f64,
    max: Duration,
    step: i32,
}

impl Backoff {
    pub fn new(initial: Duration, multiplier: f64, max: Duration) -> Self {
        Self {
            initial,
            multiplier,
            max,
            step: 0,
        }
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        let nanos = self.initial.as_nanos() as f64 * self.multiplier.powi(self.step);
        self.step = self.step.saturating_add(1);

        // Past the representable range the cap always wins.
        let current = if nanos.is_finite() && nanos < u64::MAX as f64 {
            Duration::from_nanos(nanos.round() as u64).min(self.max)
        } else {
            self.max
        };

        Some(current)
    }
}
