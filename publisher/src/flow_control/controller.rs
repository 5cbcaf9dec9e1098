use super::{FlowControlSettings, LimitExceededBehavior};
use crate::errors::{AdmissionLimit, PublishError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// Outstanding message and byte counters, readable without locking.
#[derive(Debug, Default)]
pub(crate) struct AdmissionLedger {
    elements: AtomicU64,
    bytes: AtomicU64,
}

impl AdmissionLedger {
    pub fn outstanding_elements(&self) -> u64 {
        self.elements.load(Ordering::Relaxed)
    }

    pub fn outstanding_bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    fn acquire(&self, size: usize) {
        self.elements.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(size as u64, Ordering::Relaxed);
    }

    fn release(&self, size: usize) {
        self.elements.fetch_sub(1, Ordering::Relaxed);
        self.bytes.fetch_sub(size as u64, Ordering::Relaxed);
    }
}

/// Capacity granted to a single message.
///
/// Dropping the reservation releases its capacity, so every granted reservation is released
/// exactly once. The ledger is decremented before the permits are returned.
#[derive(Debug)]
pub(crate) struct Reservation {
    size: usize,
    ledger: Arc<AdmissionLedger>,
    _element_permit: Option<OwnedSemaphorePermit>,
    _byte_permit: Option<OwnedSemaphorePermit>,
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.ledger.release(self.size);
    }
}

/// Grants or withholds capacity for new messages according to [FlowControlSettings].
///
/// Each configured ceiling is backed by a fair semaphore, so blocked callers are granted in the
/// order they started waiting. Element permits are always taken before byte permits.
#[derive(Debug)]
pub(crate) struct AdmissionController {
    settings: FlowControlSettings,
    elements: Option<Arc<Semaphore>>,
    bytes: Option<Arc<Semaphore>>,
    ledger: Arc<AdmissionLedger>,
}

impl AdmissionController {
    pub fn new(settings: FlowControlSettings) -> Self {
        let elements = settings
            .max_outstanding_element_count
            .map(|limit| Arc::new(Semaphore::new(limit)));

        let bytes = settings
            .max_outstanding_request_bytes
            .map(|limit| Arc::new(Semaphore::new(limit)));

        Self {
            settings,
            elements,
            bytes,
            ledger: Arc::new(AdmissionLedger::default()),
        }
    }

    pub fn ledger(&self) -> &AdmissionLedger {
        &self.ledger
    }

    /// Reserves capacity for a message of `size` bytes, waiting for capacity to free up when the
    /// settings ask to block.
    ///
    /// # Errors
    ///
    /// - Returns [PublishError::AdmissionRejected] if a ceiling is reached and the settings ask
    ///   to fail fast, or if the message alone is larger than the byte ceiling.
    /// - Returns [PublishError::EngineShutdown] if the controller was closed.
    pub async fn reserve(&self, size: usize) -> Result<Reservation> {
        let byte_permits = self.byte_permits(size)?;

        if let LimitExceededBehavior::FailFast = self.settings.limit_exceeded_behavior {
            return self.try_reserve(size);
        }

        let element_permit = match &self.elements {
            Some(semaphore) => Some(
                semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(closed)?,
            ),
            None => None,
        };

        let byte_permit = match &self.bytes {
            Some(semaphore) => Some(
                semaphore
                    .clone()
                    .acquire_many_owned(byte_permits)
                    .await
                    .map_err(closed)?,
            ),
            None => None,
        };

        Ok(self.grant(size, element_permit, byte_permit))
    }

    /// Reserves capacity for a message of `size` bytes without waiting.
    pub fn try_reserve(&self, size: usize) -> Result<Reservation> {
        let byte_permits = self.byte_permits(size)?;

        let element_permit = match &self.elements {
            Some(semaphore) => Some(
                semaphore
                    .clone()
                    .try_acquire_owned()
                    .map_err(|err| rejected(err, AdmissionLimit::ElementCount))?,
            ),
            None => None,
        };

        let byte_permit = match &self.bytes {
            Some(semaphore) => Some(
                semaphore
                    .clone()
                    .try_acquire_many_owned(byte_permits)
                    .map_err(|err| rejected(err, AdmissionLimit::RequestBytes))?,
            ),
            None => None,
        };

        Ok(self.grant(size, element_permit, byte_permit))
    }

    /// Wakes every blocked caller with [PublishError::EngineShutdown] and refuses new
    /// reservations. Outstanding reservations are unaffected.
    pub fn close(&self) {
        for semaphore in [&self.elements, &self.bytes].into_iter().flatten() {
            semaphore.close();
        }
    }

    fn byte_permits(&self, size: usize) -> Result<u32> {
        let too_large = PublishError::AdmissionRejected(AdmissionLimit::RequestBytes);

        match self.settings.max_outstanding_request_bytes {
            Some(limit) if size > limit => Err(too_large),
            Some(_) => u32::try_from(size).map_err(|_| too_large),
            None => Ok(0),
        }
    }

    fn grant(
        &self,
        size: usize,
        element_permit: Option<OwnedSemaphorePermit>,
        byte_permit: Option<OwnedSemaphorePermit>,
    ) -> Reservation {
        self.ledger.acquire(size);

        Reservation {
            size,
            ledger: self.ledger.clone(),
            _element_permit: element_permit,
            _byte_permit: byte_permit,
        }
    }
}

fn closed(_: AcquireError) -> PublishError {
    PublishError::EngineShutdown
}

fn rejected(err: TryAcquireError, limit: AdmissionLimit) -> PublishError {
    match err {
        TryAcquireError::NoPermits => PublishError::AdmissionRejected(limit),
        TryAcquireError::Closed => PublishError::EngineShutdown,
    }
}
