/*!
 * Workload Types
 * The unit of simulated work and its lifecycle states
 */

use crate::core::types::{ResourceId, Size, WorkloadId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Workload lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadState {
    /// Admitted into memory (or parked memory-starved), awaiting a turn
    Ready,
    /// Holding a resource and consuming its nominal duration
    Running,
    /// A resource draw collided with a busy slot
    Blocked,
    /// Ran to completion; memory and resource returned
    Terminated,
}

/// A unit of simulated work
///
/// Footprint and duration are positive by caller contract; ids are assigned
/// monotonically by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Workload {
    pub id: WorkloadId,
    pub memory_footprint: Size,
    pub nominal_duration: Duration,
    pub state: WorkloadState,
    /// Non-empty only while the workload is Running
    #[serde(skip_serializing_if = "Option::is_none")]
    pub held_resource: Option<ResourceId>,
    pub blocked: bool,
    /// Whether the admission reservation is live; keeps reconciliation from
    /// double-billing memory once a blocked flag is cleared
    #[serde(skip)]
    pub(crate) memory_reserved: bool,
}

impl Workload {
    #[must_use]
    pub fn new(id: WorkloadId, memory_footprint: Size, nominal_duration: Duration) -> Self {
        Self {
            id,
            memory_footprint,
            nominal_duration,
            state: WorkloadState::Ready,
            held_resource: None,
            blocked: false,
            memory_reserved: false,
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, WorkloadState::Ready)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, WorkloadState::Running)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        matches!(self.state, WorkloadState::Blocked)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, WorkloadState::Terminated)
    }
}
