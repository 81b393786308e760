/*!
 * Step Worker
 * Runs scheduling steps on a dedicated task, one in flight at a time
 */

use super::Scheduler;
use crate::workload::Workload;
use log::{info, warn};
use tokio::sync::{mpsc, oneshot};

/// Control messages for the worker task
enum WorkerCommand {
    Step {
        reply: oneshot::Sender<Option<Workload>>,
    },
    Shutdown,
}

/// Handle to the scheduling worker task
///
/// Commands drain strictly in order, so at most one step is in flight per
/// scheduler instance; the driver can keep reading snapshots while a
/// simulated run elapses.
pub struct StepWorker {
    command_tx: mpsc::UnboundedSender<WorkerCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl StepWorker {
    /// Spawn a worker driving the given scheduler
    #[must_use]
    pub fn spawn(scheduler: Scheduler) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker_loop(scheduler, command_rx));
        info!("Step worker spawned");
        Self {
            command_tx,
            handle: Some(handle),
        }
    }

    /// Run one scheduling step; resolves with the terminated workload, if any
    pub async fn step(&self) -> Option<Workload> {
        let (reply, response) = oneshot::channel();
        if self
            .command_tx
            .send(WorkerCommand::Step { reply })
            .is_err()
        {
            warn!("Step worker is gone, step dropped");
            return None;
        }
        response.await.unwrap_or(None)
    }

    /// Shutdown the worker gracefully
    pub async fn shutdown(mut self) {
        let _ = self.command_tx.send(WorkerCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Step worker shutdown error: {}", e);
            } else {
                info!("Step worker shutdown complete");
            }
        }
    }
}

async fn run_worker_loop(
    scheduler: Scheduler,
    mut command_rx: mpsc::UnboundedReceiver<WorkerCommand>,
) {
    while let Some(command) = command_rx.recv().await {
        match command {
            WorkerCommand::Step { reply } => {
                // The simulated run blocks, so it leaves the async runtime
                let sched = scheduler.clone();
                let result = match tokio::task::spawn_blocking(move || sched.step()).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("Step execution failed: {}", e);
                        None
                    }
                };
                let _ = reply.send(result);
            }
            WorkerCommand::Shutdown => {
                info!("Step worker shutting down");
                break;
            }
        }
    }
}

impl Drop for StepWorker {
    fn drop(&mut self) {
        // Best-effort shutdown if the handle was never awaited
        if self.handle.is_some() {
            let _ = self.command_tx.send(WorkerCommand::Shutdown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::AdmissionPolicy;
    use crate::resource::RoundRobinSelection;
    use crate::scheduler::NoDelay;
    use crate::workload::Workload;
    use std::sync::Arc;
    use std::time::Duration;

    fn scheduler() -> Scheduler {
        Scheduler::builder()
            .with_total_capacity(1000)
            .with_policy(AdmissionPolicy::Paged)
            .with_selection(Arc::new(RoundRobinSelection::new()))
            .with_delay(Arc::new(NoDelay))
            .build()
    }

    #[tokio::test]
    async fn test_worker_completes_workloads_in_order() {
        let sched = scheduler();
        sched.admit(Workload::new(0, 100, Duration::from_millis(1)));
        sched.admit(Workload::new(1, 100, Duration::from_millis(1)));

        let worker = StepWorker::spawn(sched.clone());
        assert_eq!(worker.step().await.unwrap().id, 0);
        assert_eq!(worker.step().await.unwrap().id, 1);
        assert!(worker.step().await.is_none());
        assert!(sched.is_idle());

        worker.shutdown().await;
    }

    #[tokio::test]
    async fn test_snapshots_stay_readable_during_a_run() {
        let sched = Scheduler::builder()
            .with_total_capacity(1000)
            .with_selection(Arc::new(RoundRobinSelection::new()))
            .build();
        sched.admit(Workload::new(0, 100, Duration::from_millis(50)));

        let worker = StepWorker::spawn(sched.clone());
        {
            let step = worker.step();
            tokio::pin!(step);

            // Poll the in-flight step while reading display snapshots
            loop {
                tokio::select! {
                    done = &mut step => {
                        assert_eq!(done.unwrap().id, 0);
                        break;
                    }
                    _ = tokio::time::sleep(Duration::from_millis(5)) => {
                        let _ = sched.status();
                        let _ = sched.ready_snapshot();
                        let _ = sched.resource_snapshot();
                    }
                }
            }
        }

        worker.shutdown().await;
    }

    #[test]
    fn test_worker_shutdown_is_graceful() {
        tokio_test::block_on(async {
            let worker = StepWorker::spawn(scheduler());
            worker.shutdown().await;
        });
    }
}
