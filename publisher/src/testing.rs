use crate::batching::PendingEntry;
use crate::errors::TransportError;
use crate::flow_control::{AdmissionController, FlowControlSettings};
use crate::message::{Message, MessageId};
use crate::publisher::PublishHandle;
use crate::topic_name::TopicName;
use crate::transport::BatchTransport;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Builds an admitted entry with a payload of `size` bytes.
pub(crate) fn entry(size: usize) -> (PendingEntry, PublishHandle) {
    let controller = AdmissionController::new(FlowControlSettings::default());
    let reservation = controller.try_reserve(size).unwrap();

    PendingEntry::new(Message::new(vec![0u8; size]), reservation)
}

pub(crate) fn topic() -> TopicName {
    TopicName::try_from("projects/acmeco/topics/stocks").unwrap()
}

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Ack,
    Ids(Vec<MessageId>),
    Fail(TransportError),
    Hang,
}

/// A transport that answers each call with the next scripted reply, acknowledging every call
/// once the script runs out.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Vec<Message>>>,
    next_id: AtomicU64,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchTransport for ScriptedTransport {
    async fn send_batch(
        &self,
        _topic: &TopicName,
        messages: &[Message],
    ) -> Result<Vec<MessageId>, TransportError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        let reply = self.script.lock().unwrap().pop_front().unwrap_or(Reply::Ack);

        match reply {
            Reply::Ack => Ok(messages
                .iter()
                .map(|_| self.next_id.fetch_add(1, Ordering::Relaxed).to_string())
                .collect()),
            Reply::Ids(ids) => Ok(ids),
            Reply::Fail(err) => Err(err),
            Reply::Hang => std::future::pending().await,
        }
    }
}
