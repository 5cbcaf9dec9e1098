use crate::batching::BatchConfig;
use crate::flow_control::FlowControlSettings;
use crate::retry::RetrySettings;
use crate::transport::BatchTransport;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Configuration shared by every builder state.
#[doc(hidden)]
#[derive(Debug)]
pub struct PublisherCommon {
    pub(crate) topic: String,
    pub(crate) batch_config: BatchConfig,
    pub(crate) flow_control: FlowControlSettings,
    pub(crate) retry_settings: RetrySettings,
    pub(crate) runtime: Option<Handle>,
}

impl PublisherCommon {
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_owned(),
            batch_config: BatchConfig::default(),
            flow_control: FlowControlSettings::default(),
            retry_settings: RetrySettings::default(),
            runtime: None,
        }
    }
}

#[doc(hidden)]
#[derive(Debug)]
pub struct PublisherWantsTransport {
    pub(crate) common: PublisherCommon,
}

impl PublisherWantsTransport {
    pub fn new(topic: &str) -> Self {
        Self {
            common: PublisherCommon::new(topic),
        }
    }
}

#[doc(hidden)]
pub struct PublisherWantsBuild {
    pub(crate) common: PublisherCommon,
    pub(crate) transport: Arc<dyn BatchTransport>,
}

impl PublisherWantsBuild {
    pub fn new(prev: PublisherWantsTransport, transport: Arc<dyn BatchTransport>) -> Self {
        Self {
            common: prev.common,
            transport,
        }
    }
}
