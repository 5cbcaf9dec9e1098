use super::{BatchConfig, MessageBatch, PendingEntry};
use crate::constants::MAX_BATCH_BYTES;
use crate::errors::{PublishError, Result};
use tokio::time::Instant;

/// Accumulates pending entries into the single open batch of a publisher.
///
/// The batcher is a plain state machine: it never sleeps or spawns. Closed batches are returned
/// to the caller, and the time threshold is exposed as a [deadline](Batcher::deadline) for the
/// owning task to wait on.
#[derive(Debug)]
pub(crate) struct Batcher {
    config: BatchConfig,
    current: MessageBatch,
    deadline: Option<Instant>,
}

impl Batcher {
    pub fn new(config: BatchConfig) -> Self {
        let current = MessageBatch::with_capacity(config.element_count_threshold);

        Self {
            config,
            current,
            deadline: None,
        }
    }

    /// Appends an entry to the open batch, returning every batch closed by doing so.
    ///
    /// If the entry does not fit the open batch, that batch is closed first and the entry starts
    /// a new one. A batch that reaches a threshold once the entry is appended is closed as well.
    ///
    /// # Errors
    ///
    /// Returns [PublishError::MessageTooLarge] if the entry alone exceeds
    /// [MAX_BATCH_BYTES]. The entry's handle is resolved with the same error and the open batch is
    /// left untouched.
    pub fn add(&mut self, entry: PendingEntry) -> Result<Vec<MessageBatch>> {
        let size = entry.size();

        if size > MAX_BATCH_BYTES {
            let error = PublishError::MessageTooLarge(size, MAX_BATCH_BYTES);
            entry.fail(error.clone());
            return Err(error);
        }

        let mut closed = Vec::new();

        if !self.current.is_empty() && !self.fits(size) {
            closed.push(self.close());
        }

        if self.current.is_empty() {
            self.deadline = Some(Instant::now() + self.config.delay_threshold);
        }

        self.current.push(entry);

        if self.is_full() {
            closed.push(self.close());
        }

        Ok(closed)
    }

    /// The instant at which the open batch must be flushed, if it holds any entries.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Closes the open batch if its deadline has passed.
    pub fn flush_expired(&mut self, now: Instant) -> Option<MessageBatch> {
        match self.deadline {
            Some(deadline) if deadline <= now && !self.current.is_empty() => Some(self.close()),
            _ => None,
        }
    }

    /// Closes and returns the open batch, or [None] if it is empty.
    pub fn drain(&mut self) -> Option<MessageBatch> {
        if self.current.is_empty() {
            None
        } else {
            Some(self.close())
        }
    }

    fn fits(&self, size: usize) -> bool {
        self.current.len() < self.config.element_count_threshold
            && self.current.byte_size() + size <= self.config.request_byte_threshold
    }

    fn is_full(&self) -> bool {
        self.current.len() >= self.config.element_count_threshold
            || self.current.byte_size() >= self.config.request_byte_threshold
    }

    fn close(&mut self) -> MessageBatch {
        self.deadline = None;
        let next = MessageBatch::with_capacity(self.config.element_count_threshold);
        std::mem::replace(&mut self.current, next)
    }
}
