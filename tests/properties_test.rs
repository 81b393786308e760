/*!
 * Property Tests
 * Algebraic invariants of admission and the step cycle
 */

use procsim::{
    AdmissionPolicy, NoDelay, RoundRobinSelection, Scheduler, Workload, PAGE_SIZE,
};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn engine(capacity: usize, policy: AdmissionPolicy) -> Scheduler {
    Scheduler::builder()
        .with_total_capacity(capacity)
        .with_policy(policy)
        .with_selection(Arc::new(RoundRobinSelection::new()))
        .with_delay(Arc::new(NoDelay))
        .build()
}

fn check_accounting(sched: &Scheduler) {
    let status = sched.status();
    assert!(status.used <= status.total);
    assert_eq!(status.free, status.total - status.used);
}

proptest! {
    #[test]
    fn capacity_invariant_holds_at_every_observation(
        footprints in prop::collection::vec(1usize..400, 1..20),
    ) {
        let sched = engine(1000, AdmissionPolicy::Paged);

        for (id, footprint) in footprints.iter().enumerate() {
            sched.admit(Workload::new(id as u32, *footprint, Duration::from_millis(1)));
            check_accounting(&sched);
        }

        let mut guard = 0;
        while !sched.is_idle() {
            let _ = sched.step();
            check_accounting(&sched);
            guard += 1;
            prop_assert!(guard < 1000, "engine failed to drain");
        }
        prop_assert_eq!(sched.status().used, 0);
    }

    #[test]
    fn paged_used_is_always_page_aligned(
        footprints in prop::collection::vec(1usize..400, 1..20),
    ) {
        let sched = engine(1000, AdmissionPolicy::Paged);

        for (id, footprint) in footprints.iter().enumerate() {
            sched.admit(Workload::new(id as u32, *footprint, Duration::from_millis(1)));
            prop_assert_eq!(sched.status().used % PAGE_SIZE, 0);
        }
        while sched.step().is_some() {
            prop_assert_eq!(sched.status().used % PAGE_SIZE, 0);
        }
    }

    #[test]
    fn reservation_round_trips_exactly(
        footprint in 1usize..1000,
        paged in any::<bool>(),
    ) {
        let policy = if paged { AdmissionPolicy::Paged } else { AdmissionPolicy::Compacted };
        let sched = engine(1000, policy);

        let baseline = sched.status().used;
        sched.admit(Workload::new(0, footprint, Duration::from_millis(1)));

        let reserved = sched.status().used - baseline;
        let expected = if paged {
            footprint.div_ceil(PAGE_SIZE) * PAGE_SIZE
        } else {
            footprint
        };
        prop_assert_eq!(reserved, expected);

        let done = sched.step();
        prop_assert!(done.is_some());
        prop_assert_eq!(sched.status().used, baseline);
    }

    #[test]
    fn at_most_one_completion_per_step(
        footprints in prop::collection::vec(50usize..200, 1..16),
    ) {
        let sched = engine(4000, AdmissionPolicy::Paged);
        for (id, footprint) in footprints.iter().enumerate() {
            sched.admit(Workload::new(id as u32, *footprint, Duration::from_millis(1)));
        }

        let mut last_completed = sched.stats().completed;
        let mut guard = 0;
        while !sched.is_idle() {
            let result = sched.step();
            let completed = sched.stats().completed;
            prop_assert!(completed - last_completed <= 1);
            prop_assert_eq!(result.is_some(), completed - last_completed == 1);
            last_completed = completed;
            guard += 1;
            prop_assert!(guard < 1000, "engine failed to drain");
        }
    }

    #[test]
    fn direct_admissions_complete_in_fifo_order(
        count in 1usize..10,
    ) {
        // All footprints fit, so every workload lands in ready directly
        let sched = engine(10 * PAGE_SIZE, AdmissionPolicy::Paged);
        for id in 0..count {
            sched.admit(Workload::new(id as u32, PAGE_SIZE, Duration::from_millis(1)));
        }

        let mut order = Vec::new();
        while let Some(done) = sched.step() {
            order.push(done.id as usize);
        }
        prop_assert_eq!(order, (0..count).collect::<Vec<_>>());
    }
}
