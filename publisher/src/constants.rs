//! Commonly used constants.

use std::time::Duration;

/// The maximum number of messages the service accepts in a single batch.
pub const MAX_BATCH_MESSAGES: usize = 1000;
/// The maximum number of bytes the service accepts in a single batch.
pub const MAX_BATCH_BYTES: usize = 10 * 1000 * 1000;

/// The default number of messages that closes a batch.
pub const DEFAULT_ELEMENT_COUNT_THRESHOLD: usize = 100;
/// The default number of bytes that closes a batch.
pub const DEFAULT_REQUEST_BYTES_THRESHOLD: usize = 1000;
/// The default time a batch may stay open after receiving its first message.
pub const DEFAULT_DELAY_THRESHOLD: Duration = Duration::from_millis(1);

/// The smallest total retry budget accepted for a batch.
pub const MIN_TOTAL_TIMEOUT: Duration = Duration::from_millis(100);
/// The smallest initial per-attempt timeout accepted for a batch.
pub const MIN_RPC_TIMEOUT: Duration = Duration::from_millis(10);

/// The default total retry budget for a batch.
pub const DEFAULT_TOTAL_TIMEOUT: Duration = Duration::from_secs(60);
/// The default delay before the first retry.
pub const DEFAULT_INITIAL_RETRY_DELAY: Duration = Duration::from_millis(5);
/// The default factor applied to the retry delay after each attempt.
pub const DEFAULT_RETRY_DELAY_MULTIPLIER: f64 = 2.0;
/// The default upper bound of the retry delay. Unbounded, the total budget caps it instead.
pub const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::MAX;
/// The default timeout of the first attempt.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);
/// The default factor applied to the per-attempt timeout after each attempt.
pub const DEFAULT_RPC_TIMEOUT_MULTIPLIER: f64 = 2.0;
/// The default upper bound of the per-attempt timeout.
pub const DEFAULT_MAX_RPC_TIMEOUT: Duration = DEFAULT_RPC_TIMEOUT;
