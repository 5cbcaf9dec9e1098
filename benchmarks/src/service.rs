use async_trait::async_trait;
use rand::Rng;
use selium_publisher::transport::BatchTransport;
use selium_publisher::{Message, MessageId, TopicName, TransportError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A stand-in for the remote service that acknowledges batches after a fixed latency, failing a
/// share of them with a retryable error.
pub struct SimulatedService {
    latency: Duration,
    failure_rate: f64,
    next_id: AtomicU64,
}

impl SimulatedService {
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() { 0.0 } else { failure_rate };

        Self {
            latency,
            failure_rate: failure_rate.clamp(0.0, 1.0),
            next_id: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl BatchTransport for SimulatedService {
    async fn send_batch(
        &self,
        _topic: &TopicName,
        messages: &[Message],
    ) -> Result<Vec<MessageId>, TransportError> {
        tokio::time::sleep(self.latency).await;

        if rand::thread_rng().gen_bool(self.failure_rate) {
            return Err(TransportError::unavailable("simulated outage"));
        }

        let first = self
            .next_id
            .fetch_add(messages.len() as u64, Ordering::Relaxed);

        Ok((first..first + messages.len() as u64)
            .map(|id| id.to_string())
            .collect())
    }
}
