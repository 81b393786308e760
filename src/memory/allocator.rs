/*!
 * Memory Allocator
 * Capacity accounting under paged or byte-exact admission, plus the
 * resource pool workloads contend for
 */

use super::traits::{AdmissionControl, MemoryInfo};
use super::types::{AdmissionPolicy, MemoryError, MemoryResult, MemoryStatus, PAGE_SIZE};
use crate::core::types::{Size, WorkloadId};
use crate::resource::ResourcePool;
use crate::workload::Workload;
use dashmap::DashMap;
use log::{error, info, trace};
use parking_lot::RwLock;
use std::sync::Arc;

/// Memory allocator with selectable admission policy
///
/// Under Paged, footprints are rounded up to whole pages for both the
/// admission check and the billing, and the page count is recorded per
/// workload so release always returns exactly what was reserved. Under
/// Compacted, the raw footprint is checked and billed.
pub struct MemoryAllocator {
    total: Size,
    used: Arc<RwLock<Size>>,
    policy: Arc<RwLock<AdmissionPolicy>>,
    // Pages recorded at admission, keyed by workload id (Paged only)
    reservations: Arc<DashMap<WorkloadId, Size>>,
    resources: ResourcePool,
}

impl MemoryAllocator {
    #[must_use]
    pub fn new(total: Size, policy: AdmissionPolicy, resources: ResourcePool) -> Self {
        info!(
            "Memory allocator initialized: {} units, {} policy, {} resources",
            total,
            policy.as_str(),
            resources.len()
        );
        Self {
            total,
            used: Arc::new(RwLock::new(0)),
            policy: Arc::new(RwLock::new(policy)),
            reservations: Arc::new(DashMap::new()),
            resources,
        }
    }

    /// Reserve capacity for a workload
    ///
    /// Returns false with zero side effects when capacity is insufficient.
    pub fn try_reserve(&self, workload: &Workload) -> bool {
        let policy = *self.policy.read();
        let mut used = self.used.write();
        let free = self.total - *used;

        match policy {
            AdmissionPolicy::Paged => {
                let pages = workload.memory_footprint.div_ceil(PAGE_SIZE);
                let billed = pages * PAGE_SIZE;
                if free < billed {
                    trace!(
                        "Workload {} rejected: needs {} units ({} pages), {} free",
                        workload.id,
                        billed,
                        pages,
                        free
                    );
                    return false;
                }
                *used += billed;
                self.reservations.insert(workload.id, pages);
                info!(
                    "Reserved {} pages ({} units) for workload {} ({} used / {} total)",
                    pages, billed, workload.id, *used, self.total
                );
                true
            }
            AdmissionPolicy::Compacted => {
                if free < workload.memory_footprint {
                    trace!(
                        "Workload {} rejected: needs {} units, {} free",
                        workload.id,
                        workload.memory_footprint,
                        free
                    );
                    return false;
                }
                *used += workload.memory_footprint;
                info!(
                    "Reserved {} units for workload {} ({} used / {} total)",
                    workload.memory_footprint, workload.id, *used, self.total
                );
                true
            }
        }
    }

    /// Return a workload's reservation to the free pool
    ///
    /// Under Paged the recorded page count is removed and billed back; a
    /// workload with no recorded reservation is a no-op.
    pub fn release(&self, workload: &Workload) {
        let policy = *self.policy.read();
        let billed = match policy {
            AdmissionPolicy::Paged => match self.reservations.remove(&workload.id) {
                Some((_, pages)) => pages * PAGE_SIZE,
                None => {
                    trace!(
                        "Release for workload {} with no recorded reservation",
                        workload.id
                    );
                    return;
                }
            },
            AdmissionPolicy::Compacted => workload.memory_footprint,
        };

        let mut used = self.used.write();
        debug_assert!(
            *used >= billed,
            "accounting violation: releasing {} units with {} billed",
            billed,
            *used
        );
        if *used < billed {
            // Reserve/release pairing is broken; clamp rather than wrap
            error!(
                "Accounting violation: releasing {} units for workload {} with only {} billed",
                billed, workload.id, *used
            );
            *used = 0;
        } else {
            *used -= billed;
        }
        info!(
            "Released {} units for workload {} ({} used / {} total)",
            billed, workload.id, *used, self.total
        );
    }

    /// Switch accounting policy
    ///
    /// Rejected while any reservation is live, since recorded page counts
    /// would no longer match the billing rules.
    pub fn set_policy(&self, policy: AdmissionPolicy) -> MemoryResult<()> {
        let mut current = self.policy.write();
        let used = *self.used.read();
        if used != 0 || !self.reservations.is_empty() {
            return Err(MemoryError::PolicyChangeDenied {
                used,
                reservations: self.reservations.len(),
            });
        }
        info!(
            "Admission policy changed: {} -> {}",
            current.as_str(),
            policy.as_str()
        );
        *current = policy;
        Ok(())
    }

    /// Get the accounting snapshot
    #[must_use]
    pub fn status(&self) -> MemoryStatus {
        let policy = *self.policy.read();
        let used = *self.used.read();
        MemoryStatus {
            total: self.total,
            used,
            free: self.total - used,
            pages: match policy {
                AdmissionPolicy::Paged => Some(used / PAGE_SIZE),
                AdmissionPolicy::Compacted => None,
            },
        }
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> AdmissionPolicy {
        *self.policy.read()
    }

    #[inline]
    #[must_use]
    pub const fn total(&self) -> Size {
        self.total
    }

    #[inline]
    #[must_use]
    pub fn used(&self) -> Size {
        *self.used.read()
    }

    #[inline]
    #[must_use]
    pub fn free(&self) -> Size {
        self.total - *self.used.read()
    }

    /// The resource pool owned by this allocator
    #[inline]
    #[must_use]
    pub fn resources(&self) -> &ResourcePool {
        &self.resources
    }
}

impl AdmissionControl for MemoryAllocator {
    fn try_reserve(&self, workload: &Workload) -> bool {
        MemoryAllocator::try_reserve(self, workload)
    }

    fn release(&self, workload: &Workload) {
        MemoryAllocator::release(self, workload)
    }

    fn set_policy(&self, policy: AdmissionPolicy) -> MemoryResult<()> {
        MemoryAllocator::set_policy(self, policy)
    }
}

impl MemoryInfo for MemoryAllocator {
    fn status(&self) -> MemoryStatus {
        MemoryAllocator::status(self)
    }

    fn info(&self) -> (Size, Size, Size) {
        let used = *self.used.read();
        (self.total, used, self.total - used)
    }
}

impl Clone for MemoryAllocator {
    fn clone(&self) -> Self {
        Self {
            total: self.total,
            used: Arc::clone(&self.used),
            policy: Arc::clone(&self.policy),
            reservations: Arc::clone(&self.reservations),
            resources: self.resources.clone(),
        }
    }
}
