/*!
 * Lock-Free Scheduler Statistics
 * Atomic counters for zero-contention tracking of the admission and
 * execution cycle
 */

use crate::memory::AdmissionPolicy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Scheduler statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    /// Workloads admitted straight into the ready queue
    pub total_admitted: u64,
    /// Workloads parked in the waiting queue at admission (memory-starved)
    pub waiting_admissions: u64,
    /// Workloads run to completion
    pub completed: u64,
    /// Failed resource draws that moved a workload to the waiting queue
    pub contention_blocks: u64,
    /// Waiting-to-ready promotions
    pub reconciled: u64,
    /// Workloads currently in either queue
    pub active: usize,
    pub policy: AdmissionPolicy,
}

/// Atomic scheduler statistics
///
/// Counter updates use relaxed ordering; snapshots may be mutually
/// inconsistent under concurrent updates, which is acceptable for display.
pub struct AtomicSchedulerStats {
    total_admitted: AtomicU64,
    waiting_admissions: AtomicU64,
    completed: AtomicU64,
    contention_blocks: AtomicU64,
    reconciled: AtomicU64,
    active: AtomicUsize,
    policy: parking_lot::RwLock<AdmissionPolicy>,
}

impl AtomicSchedulerStats {
    #[inline]
    pub fn new(policy: AdmissionPolicy) -> Self {
        Self {
            total_admitted: AtomicU64::new(0),
            waiting_admissions: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            contention_blocks: AtomicU64::new(0),
            reconciled: AtomicU64::new(0),
            active: AtomicUsize::new(0),
            policy: parking_lot::RwLock::new(policy),
        }
    }

    #[inline(always)]
    pub fn inc_admitted(&self) {
        self.total_admitted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_waiting_admissions(&self) {
        self.waiting_admissions.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_contention_blocks(&self) {
        self.contention_blocks.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_reconciled(&self) {
        self.reconciled.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn inc_active(&self) {
        self.active.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub fn dec_active(&self) {
        self.active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Update policy (infrequent operation)
    #[inline]
    pub fn set_policy(&self, policy: AdmissionPolicy) {
        *self.policy.write() = policy;
    }

    /// Get snapshot of current stats
    #[inline]
    pub fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            total_admitted: self.total_admitted.load(Ordering::Relaxed),
            waiting_admissions: self.waiting_admissions.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            contention_blocks: self.contention_blocks.load(Ordering::Relaxed),
            reconciled: self.reconciled.load(Ordering::Relaxed),
            active: self.active.load(Ordering::Relaxed),
            policy: *self.policy.read(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = AtomicSchedulerStats::new(AdmissionPolicy::Paged);
        stats.inc_admitted();
        stats.inc_admitted();
        stats.inc_completed();
        stats.inc_active();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_admitted, 2);
        assert_eq!(snapshot.completed, 1);
        assert_eq!(snapshot.active, 1);
        assert_eq!(snapshot.policy, AdmissionPolicy::Paged);
    }

    #[test]
    fn test_policy_update() {
        let stats = AtomicSchedulerStats::new(AdmissionPolicy::Paged);
        stats.set_policy(AdmissionPolicy::Compacted);
        assert_eq!(stats.snapshot().policy, AdmissionPolicy::Compacted);
    }
}
