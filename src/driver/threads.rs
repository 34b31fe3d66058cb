/*!
 * Dedicated-Thread Executor
 *
 * One named OS thread per worker, joined with plain join semantics.
 */

use super::report::panicked;
use super::Outcomes;
use crate::core::errors::{DriverError, DriverResult, WorkerResult};
use crate::core::sync::{Alternator, Participant};
use crate::worker::{Action, RecordSink, Worker, WorkerSummary};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::error;

type Handle = JoinHandle<WorkerResult<WorkerSummary>>;

fn spawn<A>(
    worker: Worker<A>,
    alternator: Arc<Alternator>,
    sink: Arc<dyn RecordSink>,
) -> std::io::Result<Handle>
where
    A: Action + 'static,
{
    thread::Builder::new()
        .name(worker.participant().thread_name().to_string())
        .spawn(move || worker.run(&alternator, sink.as_ref()))
}

fn join(participant: Participant, handle: Handle) -> WorkerResult<WorkerSummary> {
    match handle.join() {
        Ok(outcome) => outcome,
        Err(payload) => Err(panicked(participant, payload)),
    }
}

/// Start both workers and block until both threads exit
pub(super) fn execute<A, B>(
    alternator: Arc<Alternator>,
    sink: Arc<dyn RecordSink>,
    worker_a: Worker<A>,
    worker_b: Worker<B>,
) -> DriverResult<Outcomes>
where
    A: Action + 'static,
    B: Action + 'static,
{
    let handle_a = spawn(worker_a, alternator.clone(), sink.clone())
        .map_err(|e| DriverError::Executor(format!("failed to spawn worker A: {}", e)))?;

    let handle_b = match spawn(worker_b, alternator.clone(), sink) {
        Ok(handle) => handle,
        Err(e) => {
            error!(error = %e, "failed to spawn worker B");
            // A would otherwise wait for B forever
            alternator.cancel();
            let _ = join(Participant::A, handle_a);
            return Err(DriverError::Executor(format!("failed to spawn worker B: {}", e)));
        }
    };

    let outcome_a = join(Participant::A, handle_a);
    let outcome_b = join(Participant::B, handle_b);
    Ok((outcome_a, outcome_b))
}
