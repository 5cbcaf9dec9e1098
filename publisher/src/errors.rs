use std::fmt::{self, Display};
use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = PublishError> = std::result::Result<T, E>;

/// The flow control ceiling that caused an admission to be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdmissionLimit {
    ElementCount,
    RequestBytes,
}

impl Display for AdmissionLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElementCount => write!(f, "element count"),
            Self::RequestBytes => write!(f, "request bytes"),
        }
    }
}

/// Status classes reported by a [BatchTransport](crate::transport::BatchTransport).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    Aborted,
    Cancelled,
    DeadlineExceeded,
    Internal,
    ResourceExhausted,
    Unknown,
    Unavailable,
    InvalidArgument,
    NotFound,
    PermissionDenied,
    Unauthenticated,
    FailedPrecondition,
}

impl TransportErrorKind {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Aborted
                | Self::Cancelled
                | Self::DeadlineExceeded
                | Self::Internal
                | Self::ResourceExhausted
                | Self::Unknown
                | Self::Unavailable
        )
    }
}

impl Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Aborted => "ABORTED",
            Self::Cancelled => "CANCELLED",
            Self::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Self::Internal => "INTERNAL",
            Self::ResourceExhausted => "RESOURCE_EXHAUSTED",
            Self::Unknown => "UNKNOWN",
            Self::Unavailable => "UNAVAILABLE",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::NotFound => "NOT_FOUND",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::FailedPrecondition => "FAILED_PRECONDITION",
        };

        f.write_str(name)
    }
}

/// A classified failure of a single batch send attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transport failed with {kind}: {message}")]
pub struct TransportError {
    kind: TransportErrorKind,
    message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Unavailable, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::InvalidArgument, message)
    }

    pub fn kind(&self) -> TransportErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("Message size ({0} bytes) is greater than maximum allowed batch size ({1} bytes).")]
    MessageTooLarge(usize, usize),

    #[error("Flow control rejected the message: outstanding {0} limit reached.")]
    AdmissionRejected(AdmissionLimit),

    #[error("Retry budget of {budget:?} exhausted after {attempts} attempts.")]
    RetryBudgetExhausted {
        attempts: u32,
        budget: Duration,
        #[source]
        last_error: TransportError,
    },

    #[error("Batch send failed with a non-retryable error.")]
    TerminalSendFailure(#[source] TransportError),

    #[error("Server returned {received} message IDs for a batch of {expected} messages.")]
    IdCountMismatch { expected: usize, received: usize },

    #[error("The publisher has been shut down.")]
    EngineShutdown,

    #[error("The publish result was dropped before completion.")]
    ResultDropped,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Element count threshold must be greater than zero.")]
    ZeroElementCountThreshold,

    #[error("Request byte threshold must be greater than zero.")]
    ZeroRequestBytesThreshold,

    #[error("Delay threshold must be greater than zero.")]
    ZeroDelayThreshold,

    #[error("Element count threshold ({0}) is greater than the batch limit ({1} messages).")]
    ElementCountThresholdAboveLimit(usize, usize),

    #[error("Request byte threshold ({0}) is greater than the batch limit ({1} bytes).")]
    RequestBytesThresholdAboveLimit(usize, usize),

    #[error("Outstanding {0} limit must be greater than zero.")]
    ZeroOutstandingLimit(AdmissionLimit),

    #[error("Outstanding {0} limit ({1}) is greater than the supported maximum ({2}).")]
    OutstandingLimitTooLarge(AdmissionLimit, usize, usize),

    #[error("Total timeout ({0:?}) is shorter than the minimum ({1:?}).")]
    TotalTimeoutTooShort(Duration, Duration),

    #[error("Initial RPC timeout ({0:?}) is shorter than the minimum ({1:?}).")]
    RpcTimeoutTooShort(Duration, Duration),

    #[error("Total timeout ({total:?}) must exceed the initial RPC timeout ({rpc:?}).")]
    TotalTimeoutNotAboveRpcTimeout { total: Duration, rpc: Duration },

    #[error("Retry delay multiplier ({0}) must be a finite number of at least 1.0.")]
    InvalidRetryDelayMultiplier(f64),

    #[error("RPC timeout multiplier ({0}) must be a finite number of at least 1.0.")]
    InvalidRpcTimeoutMultiplier(f64),

    #[error("Maximum retry delay ({max:?}) is shorter than the initial retry delay ({initial:?}).")]
    MaxRetryDelayBelowInitial { initial: Duration, max: Duration },

    #[error("Maximum RPC timeout ({max:?}) is shorter than the initial RPC timeout ({initial:?}).")]
    MaxRpcTimeoutBelowInitial { initial: Duration, max: Duration },

    #[error("Invalid topic name: {0}")]
    InvalidTopicName(String),

    #[error("Topic names cannot start with the reserved prefix \"goog\".")]
    ReservedTopicName,

    #[error("No tokio runtime was provided and none is running.")]
    NoRuntime,
}
