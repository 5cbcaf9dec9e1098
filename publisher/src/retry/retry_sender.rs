use super::RetrySettings;
use crate::batching::MessageBatch;
use crate::errors::{PublishError, Result, TransportError, TransportErrorKind};
use crate::logging;
use crate::message::{Message, MessageId};
use crate::stats::PublisherStats;
use crate::topic_name::TopicName;
use crate::transport::BatchTransport;
use std::sync::Arc;
use tokio::time::{sleep, timeout, Instant};

/// Sends closed batches through a [BatchTransport], retrying retryable failures with exponential
/// backoff until the batch reaches a terminal outcome.
///
/// The sender holds no mutable state of its own, so one sender serves every in-flight batch of a
/// publisher and each batch retries independently of the others.
pub(crate) struct RetryingSender {
    topic: TopicName,
    transport: Arc<dyn BatchTransport>,
    settings: RetrySettings,
    stats: Arc<PublisherStats>,
}

impl RetryingSender {
    pub fn new(
        topic: TopicName,
        transport: Arc<dyn BatchTransport>,
        settings: RetrySettings,
        stats: Arc<PublisherStats>,
    ) -> Self {
        Self {
            topic,
            transport,
            settings,
            stats,
        }
    }

    /// Sends `batch` and resolves the handle of every message in it.
    ///
    /// Stats are updated before any handle resolves, so a caller that observes its result also
    /// observes the counters that include it.
    pub async fn send(&self, batch: MessageBatch) {
        let messages = batch.len();

        match self.send_with_retries(batch.messages()).await {
            Ok(ids) => {
                self.stats.record_batch_success(messages);
                batch.succeed(ids);
            }
            Err(err) => {
                logging::retry::batch_failed(messages, &err);
                self.stats.record_batch_failure(messages);
                batch.fail(err);
            }
        }
    }

    async fn send_with_retries(&self, messages: &[Message]) -> Result<Vec<MessageId>> {
        let budget = self.settings.total_timeout;
        let started = Instant::now();
        let mut delays = self.settings.retry_delays();
        let mut rpc_timeouts = self.settings.rpc_timeouts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.stats.record_attempt();
            logging::retry::send_attempt(attempt, messages.len());

            let remaining = budget.saturating_sub(started.elapsed());
            let rpc_timeout = rpc_timeouts.next().unwrap_or(remaining).min(remaining);
            let call = self.transport.send_batch(&self.topic, messages);

            let err = match timeout(rpc_timeout, call).await {
                Ok(Ok(ids)) if ids.len() == messages.len() => {
                    logging::retry::batch_acknowledged(attempt, messages.len());
                    return Ok(ids);
                }
                Ok(Ok(ids)) => {
                    return Err(PublishError::IdCountMismatch {
                        expected: messages.len(),
                        received: ids.len(),
                    })
                }
                Ok(Err(err)) => err,
                Err(_) => TransportError::new(
                    TransportErrorKind::DeadlineExceeded,
                    format!("attempt timed out after {rpc_timeout:?}"),
                ),
            };

            if !err.is_retryable() {
                return Err(PublishError::TerminalSendFailure(err));
            }

            let remaining = budget.saturating_sub(started.elapsed());
            let delay = delays.next().unwrap_or(remaining).min(remaining);

            if !remaining.is_zero() {
                logging::retry::retry_scheduled(attempt, delay, &err);
                sleep(delay).await;
            }

            if started.elapsed() >= budget {
                return Err(PublishError::RetryBudgetExhausted {
                    attempts: attempt,
                    budget,
                    last_error: err,
                });
            }

            self.stats.record_retry();
        }
    }
}
