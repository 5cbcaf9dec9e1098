//! Re-exports commonly used types and traits.
//!
//! Aside from conveniently re-exporting everything needed to build and use a
//! [Publisher](crate::Publisher), the prelude may continue to expand as the API evolves, so it's
//! encouraged to import the prelude to help alleviate any migration efforts as new versions of
//! the library are released.
//!
//! ```
//! use selium_publisher::prelude::*;
//! ```

pub use crate::batching::BatchConfig;
pub use crate::flow_control::{FlowControlSettings, LimitExceededBehavior};
pub use crate::retry::RetrySettings;
pub use crate::transport::BatchTransport;
pub use crate::{Message, MessageId, PublishError, PublishHandle, Publisher, TransportError};
