/*!
 * Scheduler Types
 * Admission outcomes and scheduler errors
 */

use crate::memory::MemoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scheduler operation result
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler errors
///
/// Admission rejection and resource contention are queue placements, not
/// errors; only caller mistakes surface here.
#[derive(Error, Debug, Clone)]
pub enum SchedulerError {
    #[error("Policy change under load: {ready} ready, {waiting} waiting")]
    PolicyChangeUnderLoad { ready: usize, waiting: usize },

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

/// Where admission placed a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Admission {
    /// Capacity reserved; the workload is schedulable
    Ready,
    /// Memory-starved; parked until capacity frees up
    Waiting,
}
