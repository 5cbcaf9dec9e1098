use crate::constants::{
    DEFAULT_DELAY_THRESHOLD, DEFAULT_ELEMENT_COUNT_THRESHOLD, DEFAULT_REQUEST_BYTES_THRESHOLD,
    MAX_BATCH_BYTES, MAX_BATCH_MESSAGES,
};
use crate::errors::ConfigError;
use std::time::Duration;

/// Thresholds that close an open batch.
///
/// A batch is closed and sent as soon as any one of the thresholds is crossed: the number of
/// messages, the accumulated byte size, or the time elapsed since the first message was added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub(crate) element_count_threshold: usize,
    pub(crate) request_byte_threshold: usize,
    pub(crate) delay_threshold: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

impl BatchConfig {
    pub fn new(
        element_count_threshold: usize,
        request_byte_threshold: usize,
        delay_threshold: Duration,
    ) -> Self {
        Self {
            element_count_threshold,
            request_byte_threshold,
            delay_threshold,
        }
    }

    pub fn high_throughput() -> Self {
        Self::new(MAX_BATCH_MESSAGES, 5_000_000, Duration::from_millis(50))
    }

    pub fn balanced() -> Self {
        Self::new(
            DEFAULT_ELEMENT_COUNT_THRESHOLD,
            DEFAULT_REQUEST_BYTES_THRESHOLD,
            DEFAULT_DELAY_THRESHOLD,
        )
    }

    pub fn low_latency() -> Self {
        Self::new(10, DEFAULT_REQUEST_BYTES_THRESHOLD, Duration::from_millis(1))
    }

    pub fn element_count_threshold(mut self, count: usize) -> Self {
        self.element_count_threshold = count;
        self
    }

    pub fn request_byte_threshold(mut self, bytes: usize) -> Self {
        self.request_byte_threshold = bytes;
        self
    }

    pub fn delay_threshold(mut self, delay: Duration) -> Self {
        self.delay_threshold = delay;
        self
    }

    pub fn max_messages(&self) -> usize {
        self.element_count_threshold
    }

    pub fn max_bytes(&self) -> usize {
        self.request_byte_threshold
    }

    pub fn max_delay(&self) -> Duration {
        self.delay_threshold
    }

    /// Checks that every threshold is positive and within the protocol limits.
    ///
    /// # Errors
    ///
    /// Returns the first [ConfigError] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.element_count_threshold == 0 {
            return Err(ConfigError::ZeroElementCountThreshold);
        }

        if self.element_count_threshold > MAX_BATCH_MESSAGES {
            return Err(ConfigError::ElementCountThresholdAboveLimit(
                self.element_count_threshold,
                MAX_BATCH_MESSAGES,
            ));
        }

        if self.request_byte_threshold == 0 {
            return Err(ConfigError::ZeroRequestBytesThreshold);
        }

        if self.request_byte_threshold > MAX_BATCH_BYTES {
            return Err(ConfigError::RequestBytesThresholdAboveLimit(
                self.request_byte_threshold,
                MAX_BATCH_BYTES,
            ));
        }

        if self.delay_threshold.is_zero() {
            return Err(ConfigError::ZeroDelayThreshold);
        }

        Ok(())
    }
}
