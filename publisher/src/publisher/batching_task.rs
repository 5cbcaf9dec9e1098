use crate::batching::{Batcher, MessageBatch, PendingEntry};
use crate::logging;
use crate::retry::RetryingSender;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// The single owner of a publisher's open batch.
///
/// Entries arrive over a channel, so the open batch is mutated by this task alone. Closed batches
/// are sent on their own tracked tasks, which keeps a retrying batch from holding up the next one.
pub(crate) struct BatchingTask {
    batcher: Batcher,
    entries: mpsc::UnboundedReceiver<PendingEntry>,
    sender: Arc<RetryingSender>,
    tracker: TaskTracker,
    runtime: Handle,
    closing: CancellationToken,
}

impl BatchingTask {
    pub fn new(
        batcher: Batcher,
        entries: mpsc::UnboundedReceiver<PendingEntry>,
        sender: Arc<RetryingSender>,
        tracker: TaskTracker,
        runtime: Handle,
        closing: CancellationToken,
    ) -> Self {
        Self {
            batcher,
            entries,
            sender,
            tracker,
            runtime,
            closing,
        }
    }

    /// Batches entries until the publisher closes or every sender is dropped, then flushes
    /// whatever is left.
    pub async fn run(mut self) {
        loop {
            let deadline = self.batcher.deadline();

            tokio::select! {
                biased;

                _ = self.closing.cancelled() => break,

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(batch) = self.batcher.flush_expired(Instant::now()) {
                        self.dispatch(batch);
                    }
                }

                entry = self.entries.recv() => match entry {
                    Some(entry) => self.add(entry),
                    None => break,
                },
            }
        }

        self.drain();
    }

    fn add(&mut self, entry: PendingEntry) {
        match self.batcher.add(entry) {
            Ok(closed) => closed.into_iter().for_each(|batch| self.dispatch(batch)),
            Err(err) => logging::publisher::message_rejected(&err),
        }
    }

    fn drain(&mut self) {
        // Entries sent before the channel closed are still batched; later sends fail.
        self.entries.close();

        while let Ok(entry) = self.entries.try_recv() {
            self.add(entry);
        }

        if let Some(batch) = self.batcher.drain() {
            self.dispatch(batch);
        }
    }

    fn dispatch(&self, batch: MessageBatch) {
        logging::publisher::batch_closed(batch.len(), batch.byte_size());

        let sender = self.sender.clone();
        self.tracker
            .spawn_on(async move { sender.send(batch).await }, &self.runtime);
    }
}
