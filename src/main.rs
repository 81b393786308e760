/*!
 * procsim - Batch Driver
 *
 * Stands in for the presentation layer: builds an engine from the
 * environment, submits randomized workloads, drives the step worker until
 * the queues drain, and renders status as structured log records.
 */

use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use procsim::{
    init_tracing, AdmissionPolicy, Scheduler, SeededSelection, StepWorker, Workload, WorkloadId,
};

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e| anyhow!("invalid {}={}: {}", key, value, e)),
        Err(_) => Ok(default),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("procsim starting...");

    let capacity: usize = env_parse("SIM_CAPACITY", 1000)?;
    let resources: usize = env_parse("SIM_RESOURCES", 3)?;
    let workloads: usize = env_parse("SIM_WORKLOADS", 8)?;
    let tick_ms: u64 = env_parse("SIM_TICK_MS", 100)?;
    let unblock: bool = env_parse("SIM_UNBLOCK", false)?;
    let policy = match std::env::var("SIM_POLICY") {
        Ok(value) => AdmissionPolicy::from_str(&value).map_err(|e| anyhow!(e))?,
        Err(_) => AdmissionPolicy::Paged,
    };
    let seed: Option<u64> = match std::env::var("SIM_SEED") {
        Ok(value) => Some(
            value
                .parse()
                .map_err(|e| anyhow!("invalid SIM_SEED={}: {}", value, e))?,
        ),
        Err(_) => None,
    };

    info!(
        capacity,
        resources,
        workloads,
        policy = policy.as_str(),
        unblock,
        ?seed,
        "Configuration loaded"
    );

    let mut builder = Scheduler::builder()
        .with_total_capacity(capacity)
        .with_policy(policy)
        .with_resource_pool_size(resources)
        .with_clear_blocked_on_resource_free(unblock);
    if let Some(seed) = seed {
        builder = builder.with_selection(Arc::new(SeededSelection::new(seed)));
    }
    let scheduler = builder.build();

    // Footprints of 50..=200 units, runs of 1..=5 ticks
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let tick = Duration::from_millis(tick_ms);
    for id in 0..workloads {
        let footprint = rng.gen_range(50..=200);
        let ticks: u32 = rng.gen_range(1..=5);
        let admission = scheduler.admit(Workload::new(id as WorkloadId, footprint, tick * ticks));
        info!(id, footprint, ticks, ?admission, "Workload submitted");
    }

    let worker = StepWorker::spawn(scheduler.clone());
    let mut finished = Vec::new();
    let mut stalled = 0u32;

    while !scheduler.is_idle() {
        match worker.step().await {
            Some(done) => {
                stalled = 0;
                info!(id = done.id, "Workload finished");
                finished.push(done);
            }
            None => {
                stalled += 1;
                if stalled >= 2 {
                    let blocked = scheduler
                        .waiting_snapshot()
                        .iter()
                        .filter(|w| w.blocked)
                        .count();
                    warn!(
                        blocked,
                        waiting = scheduler.waiting_snapshot().len(),
                        "No progress across consecutive steps, stopping"
                    );
                    break;
                }
            }
        }

        let status = serde_json::to_string(&scheduler.status())?;
        let resources = serde_json::to_string(&scheduler.resource_snapshot())?;
        info!(status = %status, resources = %resources, "Engine state");
    }

    worker.shutdown().await;

    let stats = serde_json::to_string(&scheduler.stats())?;
    info!(completed = finished.len(), stats = %stats, "Run complete");

    Ok(())
}
