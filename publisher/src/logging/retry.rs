use crate::errors::{PublishError, TransportError};
use std::time::Duration;

pub fn send_attempt(attempt_num: u32, messages: usize) {
    tracing::debug!(attempt_num, messages, "Sending batch...");
}

pub fn batch_acknowledged(attempt_num: u32, messages: usize) {
    tracing::debug!(attempt_num, messages, "Batch acknowledged by server.");
}

pub fn retry_scheduled(attempt_num: u32, delay: Duration, err: &TransportError) {
    tracing::warn!(
        attempt_num,
        delay_ms = delay.as_millis() as u64,
        error = err.to_string(),
        "Batch send failed, retrying after backoff..."
    );
}

pub fn batch_failed(messages: usize, err: &PublishError) {
    tracing::error!(messages, error = err.to_string(), "Failed to publish batch.");
}
