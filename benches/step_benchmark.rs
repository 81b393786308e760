/*!
 * Scheduling Step Benchmarks
 *
 * Throughput of the admit/step cycle with the simulated delay stubbed out
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use procsim::{AdmissionPolicy, NoDelay, RoundRobinSelection, Scheduler, Workload};
use std::sync::Arc;
use std::time::Duration;

fn bench_admit_step_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("admit_step_cycle");

    for policy in [AdmissionPolicy::Paged, AdmissionPolicy::Compacted] {
        group.bench_with_input(
            BenchmarkId::from_parameter(policy.as_str()),
            &policy,
            |b, &policy| {
                b.iter(|| {
                    let scheduler = Scheduler::builder()
                        .with_total_capacity(100_000)
                        .with_policy(policy)
                        .with_selection(Arc::new(RoundRobinSelection::new()))
                        .with_delay(Arc::new(NoDelay))
                        .build();

                    for id in 0..64u32 {
                        scheduler.admit(Workload::new(id, 150, Duration::from_millis(1)));
                    }
                    while let Some(done) = scheduler.step() {
                        black_box(done);
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_snapshot_reads(c: &mut Criterion) {
    let scheduler = Scheduler::builder()
        .with_total_capacity(100_000)
        .with_selection(Arc::new(RoundRobinSelection::new()))
        .with_delay(Arc::new(NoDelay))
        .build();
    for id in 0..256u32 {
        scheduler.admit(Workload::new(id, 150, Duration::from_millis(1)));
    }

    c.bench_function("ready_snapshot_256", |b| {
        b.iter(|| black_box(scheduler.ready_snapshot()));
    });
    c.bench_function("status", |b| {
        b.iter(|| black_box(scheduler.status()));
    });
}

criterion_group!(benches, bench_admit_step_cycle, bench_snapshot_reads);
criterion_main!(benches);
