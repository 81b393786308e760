/*!
 * Scheduler
 * Owns the ready and waiting queues and drives the admission, execution,
 * and release cycle against the memory allocator
 */

use crate::core::types::Size;
use crate::memory::{AdmissionPolicy, MemoryAllocator};
use crate::resource::{RandomSelection, ResourcePool, Selection};
use crate::workload::Workload;
use log::info;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;

mod delay;
mod operations;
mod stats;
mod types;
mod worker;

pub use delay::{BlockingDelay, Delay, NoDelay};
pub use stats::SchedulerStats;
pub use types::{Admission, SchedulerError, SchedulerResult};
pub use worker::StepWorker;

use stats::AtomicSchedulerStats;

/// Default capacity of the simulated memory region, in units
pub const DEFAULT_TOTAL_CAPACITY: Size = 1000;

/// Default number of mutual-exclusion resources in the pool
pub const DEFAULT_RESOURCE_POOL_SIZE: usize = 3;

/// Workload scheduler
///
/// One `step()` runs at a time per instance; queue state is only mutated
/// inside `admit()`/`step()`, and display reads go through cloned snapshots.
pub struct Scheduler {
    ready: Arc<RwLock<VecDeque<Workload>>>,
    waiting: Arc<RwLock<VecDeque<Workload>>>,
    allocator: MemoryAllocator,
    delay: Arc<dyn Delay>,
    stats: Arc<AtomicSchedulerStats>,
    // Sticky blocked flags (never cleared) when false
    clear_blocked_on_resource_free: bool,
    step_guard: Arc<Mutex<()>>,
}

impl Scheduler {
    /// Create a scheduler with default pool size, selection, and delay
    #[must_use]
    pub fn new(total_capacity: Size, policy: AdmissionPolicy) -> Self {
        Self::builder()
            .with_total_capacity(total_capacity)
            .with_policy(policy)
            .build()
    }

    #[must_use]
    pub fn builder() -> SchedulerBuilder {
        SchedulerBuilder::new()
    }

    /// The allocator this scheduler admits against
    #[inline]
    #[must_use]
    pub fn allocator(&self) -> &MemoryAllocator {
        &self.allocator
    }

    /// The resource pool workloads contend for
    #[inline]
    #[must_use]
    pub fn resources(&self) -> &ResourcePool {
        self.allocator.resources()
    }
}

impl Clone for Scheduler {
    fn clone(&self) -> Self {
        Self {
            ready: Arc::clone(&self.ready),
            waiting: Arc::clone(&self.waiting),
            allocator: self.allocator.clone(),
            delay: Arc::clone(&self.delay),
            stats: Arc::clone(&self.stats),
            clear_blocked_on_resource_free: self.clear_blocked_on_resource_free,
            step_guard: Arc::clone(&self.step_guard),
        }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`Scheduler`]
///
/// Defaults: 1000 units of capacity, paged admission, a pool of 3 resources
/// with uniform random selection, real blocking delays, and sticky blocked
/// flags.
pub struct SchedulerBuilder {
    total_capacity: Size,
    policy: AdmissionPolicy,
    resource_pool_size: usize,
    selection: Arc<dyn Selection>,
    delay: Arc<dyn Delay>,
    clear_blocked_on_resource_free: bool,
}

impl SchedulerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_capacity: DEFAULT_TOTAL_CAPACITY,
            policy: AdmissionPolicy::Paged,
            resource_pool_size: DEFAULT_RESOURCE_POOL_SIZE,
            selection: Arc::new(RandomSelection),
            delay: Arc::new(BlockingDelay),
            clear_blocked_on_resource_free: false,
        }
    }

    #[must_use]
    pub fn with_total_capacity(mut self, total_capacity: Size) -> Self {
        self.total_capacity = total_capacity;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AdmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_resource_pool_size(mut self, size: usize) -> Self {
        self.resource_pool_size = size;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Arc<dyn Selection>) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Arc<dyn Delay>) -> Self {
        self.delay = delay;
        self
    }

    /// Clear blocked flags during reconciliation whenever a pool slot is
    /// free, instead of leaving them set forever
    #[must_use]
    pub fn with_clear_blocked_on_resource_free(mut self, clear: bool) -> Self {
        self.clear_blocked_on_resource_free = clear;
        self
    }

    #[must_use]
    pub fn build(self) -> Scheduler {
        let pool = ResourcePool::new(self.resource_pool_size, self.selection);
        let allocator = MemoryAllocator::new(self.total_capacity, self.policy, pool);
        info!(
            "Scheduler initialized: capacity={}, policy={}, resources={}, unblock_on_free={}",
            self.total_capacity,
            self.policy.as_str(),
            self.resource_pool_size,
            self.clear_blocked_on_resource_free
        );
        Scheduler {
            ready: Arc::new(RwLock::new(VecDeque::new())),
            waiting: Arc::new(RwLock::new(VecDeque::new())),
            allocator,
            delay: self.delay,
            stats: Arc::new(AtomicSchedulerStats::new(self.policy)),
            clear_blocked_on_resource_free: self.clear_blocked_on_resource_free,
            step_guard: Arc::new(Mutex::new(())),
        }
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
