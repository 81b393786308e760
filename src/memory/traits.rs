/*!
 * Memory Traits
 * Admission-control abstractions
 */

use super::types::{AdmissionPolicy, MemoryResult, MemoryStatus};
use crate::core::types::Size;
use crate::workload::Workload;

/// Admission-control interface
pub trait AdmissionControl: Send + Sync {
    /// Reserve capacity for a workload; false means rejected with no side effects
    fn try_reserve(&self, workload: &Workload) -> bool;

    /// Return the workload's reservation to the free pool
    fn release(&self, workload: &Workload);

    /// Switch accounting policy; rejected while reservations are live
    fn set_policy(&self, policy: AdmissionPolicy) -> MemoryResult<()>;
}

/// Memory accounting provider
pub trait MemoryInfo: Send + Sync {
    /// Get the accounting snapshot
    fn status(&self) -> MemoryStatus;

    /// Get memory info as (total, used, free)
    fn info(&self) -> (Size, Size, Size);
}
