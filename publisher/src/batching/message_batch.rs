use crate::errors::{PublishError, Result};
use crate::flow_control::Reservation;
use crate::message::{Message, MessageId};
use crate::publisher::PublishHandle;
use tokio::sync::oneshot;

/// The caller-facing half of a submitted message: resolves its [PublishHandle] and holds the
/// flow control reservation until then.
#[derive(Debug)]
pub(crate) struct Completion {
    result_tx: oneshot::Sender<Result<MessageId>>,
    reservation: Reservation,
}

impl Completion {
    /// Releases the reservation and resolves the handle. Consumes the completion, so a handle is
    /// resolved at most once.
    pub fn resolve(self, result: Result<MessageId>) {
        let Self {
            result_tx,
            reservation,
        } = self;

        drop(reservation);
        let _ = result_tx.send(result);
    }
}

/// A submitted message paired with the completion that reports its outcome.
#[derive(Debug)]
pub(crate) struct PendingEntry {
    message: Message,
    size: usize,
    completion: Completion,
}

impl PendingEntry {
    pub fn new(message: Message, reservation: Reservation) -> (Self, PublishHandle) {
        let (result_tx, result_rx) = oneshot::channel();
        let size = message.size();

        let entry = Self {
            message,
            size,
            completion: Completion {
                result_tx,
                reservation,
            },
        };

        (entry, PublishHandle::pending(result_rx))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn fail(self, error: PublishError) {
        self.completion.resolve(Err(error));
    }
}

/// An ordered group of messages sent to the service in a single call.
///
/// Messages and their completions are kept in parallel vectors so the messages can be lent to
/// the transport as a slice on every attempt, while the completions are resolved by position once
/// the batch reaches a terminal outcome.
#[derive(Debug, Default)]
pub(crate) struct MessageBatch {
    messages: Vec<Message>,
    completions: Vec<Completion>,
    byte_size: usize,
}

impl MessageBatch {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            messages: Vec::with_capacity(capacity),
            completions: Vec::with_capacity(capacity),
            byte_size: 0,
        }
    }

    pub fn push(&mut self, entry: PendingEntry) {
        let PendingEntry {
            message,
            size,
            completion,
        } = entry;

        self.byte_size += size;
        self.messages.push(message);
        self.completions.push(completion);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn byte_size(&self) -> usize {
        self.byte_size
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Hands the Nth ID to the Nth completion.
    ///
    /// The caller must have checked that `ids` holds exactly one ID per message.
    pub fn succeed(self, ids: Vec<MessageId>) {
        debug_assert_eq!(ids.len(), self.completions.len());

        for (completion, id) in self.completions.into_iter().zip(ids) {
            completion.resolve(Ok(id));
        }
    }

    /// Fails every completion in the batch with the same error.
    pub fn fail(self, error: PublishError) {
        for completion in self.completions {
            completion.resolve(Err(error.clone()));
        }
    }
}
