//! Retrying of failed batch sends.
//!
//! A batch whose send fails with a retryable [TransportErrorKind](crate::TransportErrorKind) is
//! sent again after a delay drawn from [RetrySettings::retry_delays], until it succeeds, fails
//! with a non-retryable error, or its total time budget runs out. Every attempt is bounded by a
//! timeout drawn from [RetrySettings::rpc_timeouts], and an attempt that times out is treated as
//! a retryable failure.
//!
//! A batch is retried as a whole and its messages share its outcome.

mod retry_sender;
mod retry_settings;

pub(crate) use retry_sender::*;
pub use retry_settings::*;
