use crate::errors::{AdmissionLimit, ConfigError};
use tokio::sync::Semaphore;

/// What [publish](crate::Publisher::publish) does when a flow control ceiling is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitExceededBehavior {
    /// Suspend the caller until enough outstanding messages complete.
    #[default]
    Block,
    /// Fail the message immediately with
    /// [AdmissionRejected](crate::PublishError::AdmissionRejected).
    FailFast,
}

/// Ceilings on the messages a publisher holds between submission and a terminal outcome.
///
/// Both ceilings are optional, and an unset ceiling is unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlowControlSettings {
    pub(crate) max_outstanding_element_count: Option<usize>,
    pub(crate) max_outstanding_request_bytes: Option<usize>,
    pub(crate) limit_exceeded_behavior: LimitExceededBehavior,
}

impl FlowControlSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_outstanding_element_count(mut self, count: usize) -> Self {
        self.max_outstanding_element_count = Some(count);
        self
    }

    pub fn max_outstanding_request_bytes(mut self, bytes: usize) -> Self {
        self.max_outstanding_request_bytes = Some(bytes);
        self
    }

    pub fn limit_exceeded_behavior(mut self, behavior: LimitExceededBehavior) -> Self {
        self.limit_exceeded_behavior = behavior;
        self
    }

    pub fn element_count_limit(&self) -> Option<usize> {
        self.max_outstanding_element_count
    }

    pub fn request_bytes_limit(&self) -> Option<usize> {
        self.max_outstanding_request_bytes
    }

    pub fn behavior(&self) -> LimitExceededBehavior {
        self.limit_exceeded_behavior
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            (AdmissionLimit::ElementCount, self.max_outstanding_element_count),
            (AdmissionLimit::RequestBytes, self.max_outstanding_request_bytes),
        ];

        for (kind, limit) in limits {
            match limit {
                Some(0) => return Err(ConfigError::ZeroOutstandingLimit(kind)),
                Some(limit) if limit > Semaphore::MAX_PERMITS => {
                    return Err(ConfigError::OutstandingLimitTooLarge(
                        kind,
                        limit,
                        Semaphore::MAX_PERMITS,
                    ))
                }
                _ => {}
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_by_default() {
        let settings = FlowControlSettings::default();

        assert_eq!(settings.element_count_limit(), None);
        assert_eq!(settings.request_bytes_limit(), None);
        assert_eq!(settings.behavior(), LimitExceededBehavior::Block);
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_ceilings() {
        let settings = FlowControlSettings::new().max_outstanding_element_count(0);
        assert_eq!(
            settings.validate(),
            Err(ConfigError::ZeroOutstandingLimit(AdmissionLimit::ElementCount))
        );

        let settings = FlowControlSettings::new().max_outstanding_request_bytes(0);
        assert_eq!(
            settings.validate(),
            Err(ConfigError::ZeroOutstandingLimit(AdmissionLimit::RequestBytes))
        );
    }

    #[test]
    fn rejects_ceilings_above_semaphore_capacity() {
        let settings = FlowControlSettings::new().max_outstanding_request_bytes(usize::MAX);

        assert!(matches!(
            settings.validate(),
            Err(ConfigError::OutstandingLimitTooLarge(
                AdmissionLimit::RequestBytes,
                _,
                _
            ))
        ));
    }
}
