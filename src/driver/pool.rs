/*!
 * Fixed-Pool Executor
 *
 * Both workers are submitted to a tokio runtime whose blocking pool holds
 * exactly two threads. The driver awaits termination for a grace period;
 * when it expires the alternation is cancelled and the run fails.
 */

use super::report::panicked;
use super::Outcomes;
use crate::core::errors::{DriverError, DriverResult, WorkerResult};
use crate::core::limits::POOL_SIZE;
use crate::core::sync::{Alternator, Participant};
use crate::core::timeout::TimeoutPolicy;
use crate::worker::{Action, RecordSink, Worker, WorkerSummary};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::task::JoinError;
use tracing::{debug, warn};

fn build_runtime() -> DriverResult<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .max_blocking_threads(POOL_SIZE)
        .thread_name("alternator-pool")
        .enable_time()
        .build()
        .map_err(|e| DriverError::Executor(format!("failed to build worker pool: {}", e)))
}

fn flatten(
    participant: Participant,
    joined: Result<WorkerResult<WorkerSummary>, JoinError>,
) -> WorkerResult<WorkerSummary> {
    match joined {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => Err(panicked(participant, e.into_panic())),
        Err(e) => Err(panicked(participant, Box::new(e.to_string()))),
    }
}

/// Submit both workers and await them within `grace`
pub(super) fn execute<A, B>(
    alternator: Arc<Alternator>,
    sink: Arc<dyn RecordSink>,
    worker_a: Worker<A>,
    worker_b: Worker<B>,
    grace: TimeoutPolicy,
) -> DriverResult<Outcomes>
where
    A: Action + 'static,
    B: Action + 'static,
{
    let runtime = build_runtime()?;

    let result = runtime.block_on(async move {
        let (alt_a, sink_a) = (alternator.clone(), sink.clone());
        let task_a = tokio::task::spawn_blocking(move || worker_a.run(&alt_a, sink_a.as_ref()));
        let (alt_b, sink_b) = (alternator.clone(), sink.clone());
        let task_b = tokio::task::spawn_blocking(move || worker_b.run(&alt_b, sink_b.as_ref()));

        let mut joined = std::pin::pin!(futures::future::join(task_a, task_b));

        let Some(grace_period) = grace.duration() else {
            let (a, b) = joined.await;
            return Ok((flatten(Participant::A, a), flatten(Participant::B, b)));
        };

        match tokio::time::timeout(grace_period, joined.as_mut()).await {
            Ok((a, b)) => Ok((flatten(Participant::A, a), flatten(Participant::B, b))),
            Err(_) => {
                warn!(grace_ms = grace_period.as_millis() as u64, "workers still running, cancelling");
                alternator.cancel();
                // Waiters return promptly; a worker stuck inside an action is left behind
                if tokio::time::timeout(grace_period, joined.as_mut()).await.is_err() {
                    warn!("workers did not stop after cancellation");
                }
                Err(DriverError::ShutdownTimeout {
                    grace: grace_period,
                })
            }
        }
    });

    // Do not block on a worker that ignored cancellation
    runtime.shutdown_background();
    debug!("worker pool shut down");
    result
}
