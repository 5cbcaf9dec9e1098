use async_trait::async_trait;
use selium_publisher::transport::BatchTransport;
use selium_publisher::{Message, MessageId, TopicName, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TOPIC: &str = "projects/acmeco/topics/stocks";
pub const POISON: &str = "poison";

/// An in-memory stand-in for the remote service.
///
/// Acknowledged messages are assigned the ID `id-{payload}`, so a test can tell which message an
/// ID belongs to. Batches containing a [POISON] payload are rejected with a terminal error.
#[derive(Debug, Default)]
pub struct MockService {
    batches: Mutex<Vec<Vec<Message>>>,
    failures: Mutex<VecDeque<TransportError>>,
    always_fail: Option<TransportError>,
    latency: Option<Duration>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the next `times` calls with `error`.
    pub fn fail_times(self, times: usize, error: TransportError) -> Self {
        self.failures
            .lock()
            .unwrap()
            .extend(std::iter::repeat(error).take(times));
        self
    }

    pub fn always_fail(mut self, error: TransportError) -> Self {
        self.always_fail = Some(error);
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every batch received so far, including the ones that were failed.
    pub fn batches(&self) -> Vec<Vec<Message>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait]
impl BatchTransport for MockService {
    async fn send_batch(
        &self,
        _topic: &TopicName,
        messages: &[Message],
    ) -> Result<Vec<MessageId>, TransportError> {
        self.batches.lock().unwrap().push(messages.to_vec());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(error) = &self.always_fail {
            return Err(error.clone());
        }

        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        if messages.iter().any(|message| payload(message) == POISON) {
            return Err(TransportError::invalid_argument("poisoned batch"));
        }

        Ok(messages
            .iter()
            .map(|message| format!("id-{}", payload(message)))
            .collect())
    }
}

pub fn payload(message: &Message) -> String {
    String::from_utf8_lossy(message.data()).into_owned()
}
