//! A client-side publishing engine for topic-based messaging services.
//!
//! `selium-publisher` accepts messages one at a time and takes care of everything between the
//! caller and the wire: messages are grouped into batches bounded by count, size and time,
//! outstanding work is bounded by client-side flow control, and failed batches are retried with
//! exponential backoff until a total time budget runs out. Each call to
//! [publish](crate::Publisher::publish) yields its own [PublishHandle](crate::PublishHandle),
//! which resolves to the server-assigned message ID once the enclosing batch is acknowledged.
//!
//! The remote call itself is supplied by the caller through the
//! [BatchTransport](crate::transport::BatchTransport) trait, so channels and credentials stay
//! outside of this crate.
//!
//! # Examples
//!
//! ```no_run
//! use async_trait::async_trait;
//! use selium_publisher::transport::BatchTransport;
//! use selium_publisher::{Message, MessageId, TopicName, TransportError};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl BatchTransport for Echo {
//!     async fn send_batch(
//!         &self,
//!         _topic: &TopicName,
//!         messages: &[Message],
//!     ) -> Result<Vec<MessageId>, TransportError> {
//!         Ok((0..messages.len()).map(|i| i.to_string()).collect())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let publisher = selium_publisher::builder("projects/acmeco/topics/stocks")
//!         .with_transport(Echo)
//!         .build()?;
//!
//!     let handle = publisher.publish(Message::new("Hello, world!")).await;
//!     println!("Published message {}", handle.await?);
//!
//!     publisher.shutdown().await;
//!     Ok(())
//! }
//! ```

mod logging;
mod message;
mod publisher;
mod stats;
mod topic_name;

#[cfg(test)]
mod testing;

pub mod batching;
pub mod constants;
pub mod errors;
pub mod flow_control;
pub mod prelude;
pub mod retry;
pub mod transport;

pub use errors::{PublishError, Result, TransportError, TransportErrorKind};
pub use message::{Message, MessageId};
pub use publisher::*;
pub use stats::StatsSnapshot;
pub use topic_name::TopicName;
