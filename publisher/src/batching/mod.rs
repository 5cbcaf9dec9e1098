//! Data structures and utilities that group published messages into batches.
//!
//! Message batching reduces the number of calls made to the service for chatty
//! [Publisher](crate::Publisher) streams. Every message passed to
//! [publish](crate::Publisher::publish) is appended to a single open batch per publisher.
//!
//! ## Batching Algorithm
//!
//! The algorithm is tuned by providing a [BatchConfig] instance, which specifies the
//! `element count`, `request bytes` and `delay` thresholds. The open batch keeps collecting
//! messages until one of the following happens:
//!
//! - The batch reaches the element count or request byte threshold.
//! - A new message would push the batch past a threshold, in which case the batch is closed
//!   first and the message starts a new one.
//! - The delay threshold elapses, counted from the moment the first message entered the batch.
//! - The publisher is [shut down](crate::Publisher::shutdown).
//!
//! Closed batches are handed to the retrying sender, and never grow again. Regardless of the
//! configured thresholds, a batch never holds more than
//! [MAX_BATCH_MESSAGES](crate::constants::MAX_BATCH_MESSAGES) messages or
//! [MAX_BATCH_BYTES](crate::constants::MAX_BATCH_BYTES) bytes, and a single message larger than
//! the byte limit is rejected outright.

mod batch_config;
mod batcher;
mod message_batch;

pub use batch_config::*;
pub(crate) use batcher::*;
pub(crate) use message_batch::*;
