/*!
 * Core Types
 * Common types used across the engine
 */

/// Workload identifier, assigned monotonically by the caller
pub type WorkloadId = u32;

/// Size type for memory quantities (abstract units)
pub type Size = usize;

/// Index of a slot in the resource pool
pub type ResourceId = usize;
