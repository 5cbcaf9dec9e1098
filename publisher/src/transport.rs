//! The seam between the publishing engine and the remote service.

use crate::errors::TransportError;
use crate::message::{Message, MessageId};
use crate::topic_name::TopicName;
use async_trait::async_trait;
use std::sync::Arc;

/// Sends one batch of messages to a topic and returns the IDs assigned by the service.
///
/// A successful call must return exactly one ID per message, in the same order as `messages`.
/// Failures are classified by [TransportErrorKind](crate::TransportErrorKind), which decides
/// whether the engine retries the batch.
///
/// Implementations are shared by every in-flight batch of a publisher, so a single transport may
/// serve several concurrent calls.
#[async_trait]
pub trait BatchTransport: Send + Sync + 'static {
    async fn send_batch(
        &self,
        topic: &TopicName,
        messages: &[Message],
    ) -> Result<Vec<MessageId>, TransportError>;
}

#[async_trait]
impl<T: BatchTransport + ?Sized> BatchTransport for Arc<T> {
    async fn send_batch(
        &self,
        topic: &TopicName,
        messages: &[Message],
    ) -> Result<Vec<MessageId>, TransportError> {
        (**self).send_batch(topic, messages).await
    }
}
