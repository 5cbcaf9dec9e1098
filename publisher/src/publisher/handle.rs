use crate::errors::{PublishError, Result};
use crate::message::MessageId;
use futures::FutureExt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Resolves to the server-assigned ID of a published message, or to the error that ended its
/// lifecycle.
///
/// Every call to [publish](crate::Publisher::publish) returns its own handle, and each handle
/// resolves exactly once. Dropping a handle does not cancel the message: it is still batched and
/// sent, and its outcome is discarded.
#[derive(Debug)]
#[must_use = "a PublishHandle reports whether the message was published"]
pub struct PublishHandle {
    state: HandleState,
}

#[derive(Debug)]
enum HandleState {
    Pending(oneshot::Receiver<Result<MessageId>>),
    Failed(Option<PublishError>),
}

impl PublishHandle {
    pub(crate) fn pending(result_rx: oneshot::Receiver<Result<MessageId>>) -> Self {
        Self {
            state: HandleState::Pending(result_rx),
        }
    }

    pub(crate) fn failed(error: PublishError) -> Self {
        Self {
            state: HandleState::Failed(Some(error)),
        }
    }
}

impl Future for PublishHandle {
    type Output = Result<MessageId>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            HandleState::Pending(result_rx) => result_rx
                .poll_unpin(cx)
                .map(|result| result.unwrap_or(Err(PublishError::ResultDropped))),
            HandleState::Failed(error) => {
                Poll::Ready(Err(error.take().unwrap_or(PublishError::ResultDropped)))
            }
        }
    }
}
