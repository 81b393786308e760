/*!
 * Workload Module
 * Simulated units of work
 */

pub mod types;

pub use types::{Workload, WorkloadState};
