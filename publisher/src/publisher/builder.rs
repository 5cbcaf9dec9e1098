use super::states::{PublisherCommon, PublisherWantsBuild, PublisherWantsTransport};
use super::Publisher;
use crate::batching::BatchConfig;
use crate::errors::ConfigError;
use crate::flow_control::{FlowControlSettings, LimitExceededBehavior};
use crate::retry::RetrySettings;
use crate::topic_name::TopicName;
use crate::transport::BatchTransport;
use std::sync::Arc;
use tokio::runtime::Handle;

/// A convenient builder struct used to build a [Publisher] instance.
///
/// The [PublisherBuilder] uses a type-level Finite State Machine to assure that a [Publisher]
/// cannot be constructed without a transport. The [build](PublisherBuilder::build) method is not
/// in scope until a [BatchTransport] has been provided via
/// [with_transport](PublisherBuilder::with_transport).
///
/// **NOTE:** The [PublisherBuilder] type is not intended to be used directly. Use the
/// [builder](crate::builder) function to construct a [PublisherBuilder] in its initial state.
#[derive(Debug)]
pub struct PublisherBuilder<T> {
    pub(crate) state: T,
}

#[doc(hidden)]
pub trait BuilderState {
    fn common_mut(&mut self) -> &mut PublisherCommon;
}

impl BuilderState for PublisherWantsTransport {
    fn common_mut(&mut self) -> &mut PublisherCommon {
        &mut self.common
    }
}

impl BuilderState for PublisherWantsBuild {
    fn common_mut(&mut self) -> &mut PublisherCommon {
        &mut self.common
    }
}

impl<T: BuilderState> PublisherBuilder<T> {
    /// Overrides the batching thresholds. Defaults to [BatchConfig::balanced].
    pub fn with_batching(mut self, config: BatchConfig) -> Self {
        self.state.common_mut().batch_config = config;
        self
    }

    /// Overrides the flow control ceilings. Flow control is unbounded by default.
    pub fn with_flow_control(mut self, settings: FlowControlSettings) -> Self {
        self.state.common_mut().flow_control = settings;
        self
    }

    /// Shorthand for choosing between [LimitExceededBehavior::FailFast] and
    /// [LimitExceededBehavior::Block] on the current flow control settings.
    ///
    /// Calling [with_flow_control](Self::with_flow_control) afterwards replaces this choice.
    pub fn fail_on_flow_control_limits(mut self, fail: bool) -> Self {
        let behavior = if fail {
            LimitExceededBehavior::FailFast
        } else {
            LimitExceededBehavior::Block
        };

        self.state.common_mut().flow_control.limit_exceeded_behavior = behavior;
        self
    }

    pub fn with_retry_settings(mut self, settings: RetrySettings) -> Self {
        self.state.common_mut().retry_settings = settings;
        self
    }

    /// Runs the publisher's batching and sending tasks on `runtime` instead of the runtime that
    /// calls [build](PublisherBuilder::build).
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.state.common_mut().runtime = Some(runtime);
        self
    }
}

impl PublisherBuilder<PublisherWantsTransport> {
    /// Specifies the [BatchTransport] the [Publisher] uses to send closed batches.
    pub fn with_transport<T: BatchTransport>(
        self,
        transport: T,
    ) -> PublisherBuilder<PublisherWantsBuild> {
        let next_state = PublisherWantsBuild::new(self.state, Arc::new(transport));
        PublisherBuilder { state: next_state }
    }
}

impl PublisherBuilder<PublisherWantsBuild> {
    /// Validates the configuration and starts the publisher.
    ///
    /// # Errors
    ///
    /// Returns the first [ConfigError] found in the topic name, batching, flow control or retry
    /// configuration, or [ConfigError::NoRuntime] if no runtime was provided and the caller is
    /// not running inside one.
    pub fn build(self) -> Result<Publisher, ConfigError> {
        let PublisherWantsBuild { common, transport } = self.state;

        let topic = TopicName::try_from(common.topic.as_str())?;
        common.batch_config.validate()?;
        common.flow_control.validate()?;
        common.retry_settings.validate()?;

        let runtime = match common.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|_| ConfigError::NoRuntime)?,
        };

        Ok(Publisher::spawn(
            topic,
            transport,
            common.batch_config,
            common.flow_control,
            common.retry_settings,
            runtime,
        ))
    }
}
