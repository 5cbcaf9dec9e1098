use crate::flow_control::AdmissionLedger;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters describing the lifetime activity of a publisher.
#[derive(Debug, Default)]
pub(crate) struct PublisherStats {
    messages_published: AtomicU64,
    messages_failed: AtomicU64,
    batches_sent: AtomicU64,
    batches_failed: AtomicU64,
    send_attempts: AtomicU64,
    retries: AtomicU64,
    admission_rejections: AtomicU64,
}

impl PublisherStats {
    pub fn record_attempt(&self) {
        self.send_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch_success(&self, messages: usize) {
        self.batches_sent.fetch_add(1, Ordering::Relaxed);
        self.messages_published
            .fetch_add(messages as u64, Ordering::Relaxed);
    }

    pub fn record_batch_failure(&self, messages: usize) {
        self.batches_failed.fetch_add(1, Ordering::Relaxed);
        self.messages_failed
            .fetch_add(messages as u64, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.admission_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, ledger: &AdmissionLedger) -> StatsSnapshot {
        StatsSnapshot {
            messages_published: self.messages_published.load(Ordering::Relaxed),
            messages_failed: self.messages_failed.load(Ordering::Relaxed),
            batches_sent: self.batches_sent.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            send_attempts: self.send_attempts.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            admission_rejections: self.admission_rejections.load(Ordering::Relaxed),
            outstanding_elements: ledger.outstanding_elements(),
            outstanding_bytes: ledger.outstanding_bytes(),
        }
    }
}

/// A point-in-time copy of a publisher's counters.
///
/// Counters are read independently, so a snapshot taken while batches are in flight may not be
/// internally consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Messages whose batch was acknowledged by the service.
    pub messages_published: u64,
    /// Messages whose batch failed after admission.
    pub messages_failed: u64,
    pub batches_sent: u64,
    pub batches_failed: u64,
    /// Send attempts, including the first attempt of every batch.
    pub send_attempts: u64,
    pub retries: u64,
    /// Publish calls refused by flow control.
    pub admission_rejections: u64,
    /// Admitted messages without a terminal outcome yet.
    pub outstanding_elements: u64,
    pub outstanding_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_recorded_activity() {
        let stats = PublisherStats::default();
        let ledger = AdmissionLedger::default();

        stats.record_attempt();
        stats.record_attempt();
        stats.record_retry();
        stats.record_batch_success(3);
        stats.record_batch_failure(2);
        stats.record_rejection();

        let snapshot = stats.snapshot(&ledger);

        assert_eq!(
            snapshot,
            StatsSnapshot {
                messages_published: 3,
                messages_failed: 2,
                batches_sent: 1,
                batches_failed: 1,
                send_attempts: 2,
                retries: 1,
                admission_rejections: 1,
                outstanding_elements: 0,
                outstanding_bytes: 0,
            }
        );
    }
}
