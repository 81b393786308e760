/*!
 * Scheduler Core Operations
 * Admission, the step cycle, reconciliation, and display snapshots
 */

use super::types::{Admission, SchedulerError, SchedulerResult};
use super::Scheduler;
use super::SchedulerStats;
use crate::memory::{AdmissionPolicy, MemoryStatus};
use crate::resource::ResourceState;
use crate::workload::{Workload, WorkloadState};
use log::{info, trace, warn};
use std::collections::VecDeque;

impl Scheduler {
    /// Admit a workload
    ///
    /// Capacity reserved puts it at the back of the ready queue; rejection
    /// parks it memory-starved in the waiting queue. Never an error.
    pub fn admit(&self, mut workload: Workload) -> Admission {
        debug_assert!(workload.memory_footprint > 0, "footprint must be positive");
        debug_assert!(
            !workload.nominal_duration.is_zero(),
            "duration must be positive"
        );

        self.stats.inc_active();
        if self.allocator.try_reserve(&workload) {
            workload.memory_reserved = true;
            workload.state = WorkloadState::Ready;
            info!(
                "Workload {} admitted to ready queue ({} units)",
                workload.id, workload.memory_footprint
            );
            self.ready.write().push_back(workload);
            self.stats.inc_admitted();
            Admission::Ready
        } else {
            // Memory-starved, not blocked: still Ready, just not schedulable
            info!(
                "Workload {} memory-starved, parked in waiting queue ({} units)",
                workload.id, workload.memory_footprint
            );
            self.waiting.write().push_back(workload);
            self.stats.inc_waiting_admissions();
            Admission::Waiting
        }
    }

    /// Run one scheduling step
    ///
    /// Reconciles the waiting queue, then walks the ready queue in FIFO
    /// order: a failed resource draw moves the workload to waiting and the
    /// scan continues; the first successful draw runs that workload to
    /// completion and ends the step. At most one workload terminates per
    /// call. Calling with both queues empty is a no-op.
    pub fn step(&self) -> Option<Workload> {
        let _step = self.step_guard.lock();

        if self.is_idle() {
            trace!("Step on an idle scheduler is a no-op");
            return None;
        }

        self.reconcile();

        loop {
            let next = self.ready.write().pop_front();
            let Some(mut workload) = next else { break };

            match self.resources().acquire() {
                None => {
                    workload.blocked = true;
                    workload.state = WorkloadState::Blocked;
                    info!("Workload {} blocked on resource contention", workload.id);
                    self.waiting.write().push_back(workload);
                    self.stats.inc_contention_blocks();
                }
                Some(resource) => {
                    workload.state = WorkloadState::Running;
                    workload.held_resource = Some(resource);
                    info!(
                        "Workload {} running on resource {} for {:?}",
                        workload.id, resource, workload.nominal_duration
                    );

                    // No queue locks held while the simulated run elapses;
                    // snapshot reads stay available to the display
                    self.delay.run(workload.nominal_duration);

                    self.resources().release(resource);
                    self.allocator.release(&workload);
                    workload.held_resource = None;
                    workload.memory_reserved = false;
                    workload.state = WorkloadState::Terminated;
                    self.stats.inc_completed();
                    self.stats.dec_active();
                    info!("Workload {} terminated", workload.id);
                    return Some(workload);
                }
            }
        }

        // Every ready workload blocked this cycle; give waiting a second look
        self.reconcile();
        None
    }

    /// Move eligible waiting workloads back to the ready queue
    ///
    /// A workload is eligible when its blocked flag is clear and either its
    /// admission reservation is still live (it was blocked on a resource,
    /// not on memory) or a fresh reservation succeeds.
    fn reconcile(&self) {
        let mut waiting = self.waiting.write();
        if waiting.is_empty() {
            return;
        }

        if self.clear_blocked_on_resource_free && self.resources().any_free() {
            for workload in waiting.iter_mut() {
                if workload.blocked {
                    workload.blocked = false;
                    workload.state = WorkloadState::Ready;
                    trace!("Workload {} unblocked, pool has a free slot", workload.id);
                }
            }
        }

        let mut ready = self.ready.write();
        let mut still_waiting = VecDeque::with_capacity(waiting.len());
        while let Some(mut workload) = waiting.pop_front() {
            if workload.blocked {
                still_waiting.push_back(workload);
                continue;
            }
            if workload.memory_reserved {
                trace!("Workload {} rejoins ready queue", workload.id);
                self.stats.inc_reconciled();
                ready.push_back(workload);
            } else if self.allocator.try_reserve(&workload) {
                workload.memory_reserved = true;
                workload.state = WorkloadState::Ready;
                info!("Workload {} promoted from waiting to ready", workload.id);
                self.stats.inc_reconciled();
                ready.push_back(workload);
            } else {
                still_waiting.push_back(workload);
            }
        }
        *waiting = still_waiting;
    }

    /// Switch admission policy
    ///
    /// A precondition violation while either queue is non-empty; the change
    /// is rejected, never queued or silently applied.
    pub fn set_policy(&self, policy: AdmissionPolicy) -> SchedulerResult<()> {
        let ready = self.ready.read().len();
        let waiting = self.waiting.read().len();
        if ready != 0 || waiting != 0 {
            warn!(
                "Policy change to {} rejected: {} ready, {} waiting",
                policy.as_str(),
                ready,
                waiting
            );
            return Err(SchedulerError::PolicyChangeUnderLoad { ready, waiting });
        }
        self.allocator.set_policy(policy)?;
        self.stats.set_policy(policy);
        Ok(())
    }

    /// Memory accounting snapshot
    #[must_use]
    pub fn status(&self) -> MemoryStatus {
        self.allocator.status()
    }

    /// Cloned view of the ready queue, in scheduling order
    #[must_use]
    pub fn ready_snapshot(&self) -> Vec<Workload> {
        self.ready.read().iter().cloned().collect()
    }

    /// Cloned view of the waiting queue, in arrival order
    #[must_use]
    pub fn waiting_snapshot(&self) -> Vec<Workload> {
        self.waiting.read().iter().cloned().collect()
    }

    /// Cloned view of the resource pool
    #[must_use]
    pub fn resource_snapshot(&self) -> Vec<ResourceState> {
        self.resources().snapshot()
    }

    /// Counter snapshot
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.stats.snapshot()
    }

    /// Number of workloads in either queue
    #[must_use]
    pub fn len(&self) -> usize {
        self.ready.read().len() + self.waiting.read().len()
    }

    /// Whether both queues are empty
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.ready.read().is_empty() && self.waiting.read().is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_idle()
    }
}
