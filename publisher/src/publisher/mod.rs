mod batching_task;
mod builder;
mod handle;
mod states;

pub use builder::*;
pub use handle::*;
pub use states::*;

use crate::batching::{BatchConfig, Batcher, PendingEntry};
use crate::constants::MAX_BATCH_BYTES;
use crate::errors::{PublishError, Result};
use crate::flow_control::{AdmissionController, FlowControlSettings};
use crate::logging;
use crate::message::Message;
use crate::retry::{RetrySettings, RetryingSender};
use crate::stats::{PublisherStats, StatsSnapshot};
use crate::topic_name::TopicName;
use crate::transport::BatchTransport;
use batching_task::BatchingTask;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Constructs a [PublisherBuilder] in its initial state for the given `topic`.
///
/// The topic must be a fully qualified name of the form `projects/{project}/topics/{topic}`. It
/// is validated when the publisher is built.
pub fn builder(topic: &str) -> PublisherBuilder<PublisherWantsTransport> {
    PublisherBuilder {
        state: PublisherWantsTransport::new(topic),
    }
}

/// Publishes messages to a single topic.
///
/// Messages passed to [publish](Publisher::publish) are admitted by flow control, grouped into
/// batches by a dedicated batching task, and sent through the publisher's
/// [BatchTransport](crate::transport::BatchTransport) with retries. Every message gets its own
/// [PublishHandle].
///
/// A Publisher is cheap to clone, and all clones feed the same batches. Dropping every clone
/// without calling [shutdown](Publisher::shutdown) still flushes and sends the open batch, but
/// nothing waits for the sends to finish.
///
/// **Note:** The Publisher struct is never constructed directly, but rather, via a
/// [PublisherBuilder].
#[derive(Clone)]
pub struct Publisher {
    inner: Arc<PublisherInner>,
}

struct PublisherInner {
    topic: TopicName,
    batch_config: BatchConfig,
    flow_control: FlowControlSettings,
    retry_settings: RetrySettings,
    admission: AdmissionController,
    stats: Arc<PublisherStats>,
    entries: mpsc::UnboundedSender<PendingEntry>,
    closing: CancellationToken,
    tracker: TaskTracker,
}

impl Publisher {
    pub(crate) fn spawn(
        topic: TopicName,
        transport: Arc<dyn BatchTransport>,
        batch_config: BatchConfig,
        flow_control: FlowControlSettings,
        retry_settings: RetrySettings,
        runtime: Handle,
    ) -> Self {
        let stats = Arc::new(PublisherStats::default());
        let closing = CancellationToken::new();
        let tracker = TaskTracker::new();
        let (entries_tx, entries_rx) = mpsc::unbounded_channel();

        let sender = RetryingSender::new(
            topic.clone(),
            transport,
            retry_settings.clone(),
            stats.clone(),
        );

        let task = BatchingTask::new(
            Batcher::new(batch_config.clone()),
            entries_rx,
            Arc::new(sender),
            tracker.clone(),
            runtime.clone(),
            closing.clone(),
        );

        tracker.spawn_on(task.run(), &runtime);
        logging::publisher::publisher_started(&topic);

        let inner = PublisherInner {
            topic,
            batch_config,
            admission: AdmissionController::new(flow_control.clone()),
            flow_control,
            retry_settings,
            stats,
            entries: entries_tx,
            closing,
            tracker,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// Submits a message for publishing and returns the handle that reports its outcome.
    ///
    /// The returned future completes once the message has been admitted, without waiting for it
    /// to be sent. It only suspends when flow control is configured to
    /// [Block](crate::flow_control::LimitExceededBehavior::Block) and a ceiling has been reached.
    ///
    /// A message that cannot be admitted yields a handle that has already failed with:
    ///
    /// - [PublishError::MessageTooLarge] if the message is larger than
    ///   [MAX_BATCH_BYTES](crate::constants::MAX_BATCH_BYTES).
    /// - [PublishError::AdmissionRejected] if flow control refused it.
    /// - [PublishError::EngineShutdown] if the publisher is shutting down.
    pub async fn publish(&self, message: impl Into<Message>) -> PublishHandle {
        match self.admit(message.into()).await {
            Ok(handle) => handle,
            Err(err) => {
                logging::publisher::message_rejected(&err);
                PublishHandle::failed(err)
            }
        }
    }

    async fn admit(&self, message: Message) -> Result<PublishHandle> {
        let size = message.size();

        if size > MAX_BATCH_BYTES {
            return Err(PublishError::MessageTooLarge(size, MAX_BATCH_BYTES));
        }

        if self.inner.closing.is_cancelled() {
            return Err(PublishError::EngineShutdown);
        }

        let reservation = self.inner.admission.reserve(size).await.map_err(|err| {
            if let PublishError::AdmissionRejected(_) = err {
                self.inner.stats.record_rejection();
            }
            err
        })?;

        // Shutdown may have started while this call was waiting for capacity.
        if self.inner.closing.is_cancelled() {
            return Err(PublishError::EngineShutdown);
        }

        let (entry, handle) = PendingEntry::new(message, reservation);

        if let Err(mpsc::error::SendError(entry)) = self.inner.entries.send(entry) {
            entry.fail(PublishError::EngineShutdown);
        }

        Ok(handle)
    }

    /// Stops accepting messages, flushes the open batch and waits until every admitted message
    /// has reached a terminal outcome, including batches that are still retrying.
    ///
    /// Calling `shutdown` again, or from several clones, waits for the same drain.
    pub async fn shutdown(&self) {
        if !self.inner.closing.is_cancelled() {
            logging::publisher::shutdown_started(&self.inner.topic);
        }

        self.inner.closing.cancel();
        self.inner.admission.close();
        self.inner.tracker.close();
        self.inner.tracker.wait().await;

        logging::publisher::shutdown_complete(&self.inner.topic);
    }

    /// Returns `true` once [shutdown](Publisher::shutdown) has been called on any clone.
    pub fn is_closed(&self) -> bool {
        self.inner.closing.is_cancelled()
    }

    /// Takes a snapshot of the publisher's counters without blocking in-flight sends.
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot(self.inner.admission.ledger())
    }

    pub fn topic(&self) -> &TopicName {
        &self.inner.topic
    }

    pub fn batch_config(&self) -> &BatchConfig {
        &self.inner.batch_config
    }

    pub fn flow_control(&self) -> &FlowControlSettings {
        &self.inner.flow_control
    }

    pub fn retry_settings(&self) -> &RetrySettings {
        &self.inner.retry_settings
    }
}
