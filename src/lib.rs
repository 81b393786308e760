/*!
 * procsim Library
 * Cooperative workload-scheduling simulation engine: admission control over
 * a fixed memory capacity, a small pool of mutually-exclusive resources,
 * and a one-completion-per-step scheduler
 */

pub mod core;
pub mod memory;
pub mod resource;
pub mod scheduler;
pub mod telemetry;
pub mod workload;

// Re-exports
pub use crate::core::types::{ResourceId, Size, WorkloadId};
pub use memory::{
    AdmissionControl, AdmissionPolicy, MemoryAllocator, MemoryError, MemoryInfo, MemoryResult,
    MemoryStatus, PAGE_SIZE,
};
pub use resource::{
    RandomSelection, ResourcePool, ResourceState, RoundRobinSelection, SeededSelection, Selection,
};
pub use scheduler::{
    Admission, BlockingDelay, Delay, NoDelay, Scheduler, SchedulerBuilder, SchedulerError,
    SchedulerResult, SchedulerStats, StepWorker, DEFAULT_RESOURCE_POOL_SIZE,
    DEFAULT_TOTAL_CAPACITY,
};
pub use telemetry::init_tracing;
pub use workload::{Workload, WorkloadState};
