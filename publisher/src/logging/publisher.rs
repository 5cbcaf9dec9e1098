use crate::errors::PublishError;
use crate::topic_name::TopicName;

pub fn publisher_started(topic: &TopicName) {
    tracing::info!(topic = %topic, "Publisher started.");
}

pub fn message_rejected(err: &PublishError) {
    tracing::warn!(error = err.to_string(), "Message rejected before batching.");
}

pub fn batch_closed(messages: usize, bytes: usize) {
    tracing::debug!(messages, bytes, "Closed batch for sending.");
}

pub fn shutdown_started(topic: &TopicName) {
    tracing::info!(topic = %topic, "Shutting down publisher, flushing pending messages...");
}

pub fn shutdown_complete(topic: &TopicName) {
    tracing::info!(topic = %topic, "Publisher shut down.");
}
