//! Client-side flow control that bounds the memory held by a publisher.
//!
//! Every published message is outstanding from the moment it is admitted until its batch
//! reaches a terminal outcome: acknowledged by the service, or failed after retries. The
//! [FlowControlSettings] put optional ceilings on the number and the total size of outstanding
//! messages, and a [LimitExceededBehavior] decides whether a publish call that would cross a
//! ceiling waits for capacity or fails immediately.
//!
//! Waiting callers are served in FIFO order per ceiling, so capacity freed by completions is
//! handed out in the order the callers started waiting.

mod controller;
mod settings;

pub(crate) use controller::*;
pub use settings::*;
