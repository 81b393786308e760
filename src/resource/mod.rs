/*!
 * Resource Pool
 * Fixed set of mutually-exclusive tokens workloads compete for
 */

mod selection;

pub use selection::{RandomSelection, RoundRobinSelection, SeededSelection, Selection};

use crate::core::types::ResourceId;
use log::trace;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Display snapshot of one pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourceState {
    pub locked: bool,
}

/// Fixed-size pool of mutual-exclusion tokens
///
/// Slots are created once and never destroyed. An acquire draws exactly one
/// candidate through the selection strategy; a busy candidate fails the
/// whole attempt rather than retrying, which is how contention becomes
/// observable to the scheduler.
pub struct ResourcePool {
    slots: Arc<RwLock<Vec<bool>>>,
    selection: Arc<dyn Selection>,
}

impl ResourcePool {
    #[must_use]
    pub fn new(size: usize, selection: Arc<dyn Selection>) -> Self {
        Self {
            slots: Arc::new(RwLock::new(vec![false; size])),
            selection,
        }
    }

    /// Attempt to acquire one slot via the selection strategy
    ///
    /// Returns `None` when the drawn slot is busy (or the pool is empty);
    /// the caller must treat that as a blocking event, not retry here.
    pub fn acquire(&self) -> Option<ResourceId> {
        let mut slots = self.slots.write();
        if slots.is_empty() {
            return None;
        }
        let id = self.selection.pick(slots.len());
        let slot = slots.get_mut(id)?;
        if *slot {
            trace!("Resource {} busy, draw failed", id);
            None
        } else {
            *slot = true;
            trace!("Resource {} acquired", id);
            Some(id)
        }
    }

    /// Lock a specific slot, bypassing the selection strategy
    ///
    /// Lets an embedder model an external holder. Returns false when the
    /// slot is already locked or out of range.
    pub fn acquire_slot(&self, id: ResourceId) -> bool {
        let mut slots = self.slots.write();
        match slots.get_mut(id) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        }
    }

    /// Unlock a slot; idempotent on an already-unlocked slot
    pub fn release(&self, id: ResourceId) {
        let mut slots = self.slots.write();
        if let Some(slot) = slots.get_mut(id) {
            *slot = false;
            trace!("Resource {} released", id);
        }
    }

    /// Whether at least one slot is free
    #[must_use]
    pub fn any_free(&self) -> bool {
        self.slots.read().iter().any(|locked| !locked)
    }

    /// Number of slots in the pool
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }

    /// Read-only ordered view for display
    #[must_use]
    pub fn snapshot(&self) -> Vec<ResourceState> {
        self.slots
            .read()
            .iter()
            .map(|&locked| ResourceState { locked })
            .collect()
    }
}

impl Clone for ResourcePool {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
            selection: Arc::clone(&self.selection),
        }
    }
}
