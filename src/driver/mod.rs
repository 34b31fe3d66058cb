/*!
 * Driver
 *
 * Wires two workers to one alternator, runs them concurrently and waits for
 * both before reporting. The alternator is created before either worker is
 * started and dropped after both are joined.
 *
 * # Executors
 *
 * - `ExecutorKind::Threads`: dedicated threads, unbounded join
 * - `ExecutorKind::Pool`: fixed pool of two, join bounded by a grace period
 *
 * Correctness never depends on which worker is started first.
 */

mod config;
mod pool;
mod report;
mod threads;

pub use config::{
    DriverConfig, ExecutorKind, ENV_EXECUTOR, ENV_OUTPUT, ENV_ROUNDS, ENV_TURN_TIMEOUT_MS,
};
pub use report::RunReport;

use crate::core::errors::{DriverError, DriverResult, WorkerResult};
use crate::core::sync::{Alternator, Participant};
use crate::monitoring::generate_run_id;
use crate::worker::{Action, RecordSink, StdoutSink, TableAction, Worker, WorkerSummary};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span};

/// Raw outcomes of worker A and worker B
pub(crate) type Outcomes = (WorkerResult<WorkerSummary>, WorkerResult<WorkerSummary>);

/// Runs the two-worker alternation
pub struct Driver {
    config: DriverConfig,
    sink: Arc<dyn RecordSink>,
}

impl Driver {
    /// Driver printing records to stdout in the configured format
    pub fn new(config: DriverConfig) -> Self {
        let sink = Arc::new(StdoutSink::new(config.output));
        Self { config, sink }
    }

    /// Driver delivering records to `sink`
    pub fn with_sink(config: DriverConfig, sink: Arc<dyn RecordSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Run the configured multiplication-table workers
    pub fn run(&self) -> DriverResult<RunReport> {
        let (worker_a, worker_b) = table_workers(&self.config);
        self.run_workers(worker_a, worker_b)
    }

    /// Run arbitrary workers
    ///
    /// `worker_a` must be participant A and `worker_b` participant B;
    /// anything else fails with `DriverError::MisassignedWorkers` before
    /// either worker starts.
    pub fn run_workers<A, B>(&self, worker_a: Worker<A>, worker_b: Worker<B>) -> DriverResult<RunReport>
    where
        A: Action + 'static,
        B: Action + 'static,
    {
        if worker_a.participant() != Participant::A || worker_b.participant() != Participant::B {
            let err = DriverError::MisassignedWorkers {
                worker_a: worker_a.participant(),
                worker_b: worker_b.participant(),
            };
            error!(error = %err, "refusing to start alternation");
            return Err(err);
        }

        let run_id = generate_run_id();
        let span = info_span!("alternation", run_id = %run_id, executor = ?self.config.executor);
        let _entered = span.enter();
        let start = Instant::now();

        let alternator = Arc::new(Alternator::new(self.config.alternator_config()));
        info!(
            rounds_a = worker_a.rounds(),
            rounds_b = worker_b.rounds(),
            turn_timeout = self.config.turn_timeout.category(),
            "starting alternation"
        );

        let outcomes = match self.config.executor {
            ExecutorKind::Threads => {
                threads::execute(alternator.clone(), self.sink.clone(), worker_a, worker_b)
            }
            ExecutorKind::Pool => pool::execute(
                alternator.clone(),
                self.sink.clone(),
                worker_a,
                worker_b,
                self.config.shutdown_grace,
            ),
        };

        let settled = outcomes.and_then(|(a, b)| report::settle(a, b));
        let stats = alternator.stats();

        match settled {
            Ok(workers) => {
                let run_report = RunReport {
                    run_id,
                    executor: self.config.executor,
                    workers,
                    stats,
                    elapsed: start.elapsed(),
                };
                info!(
                    actions = run_report.total_actions(),
                    turns = stats.turns_granted,
                    spurious_wakeups = stats.spurious_wakeups,
                    elapsed_us = run_report.elapsed.as_micros() as u64,
                    "alternation completed"
                );
                Ok(run_report)
            }
            Err(e) => {
                error!(error = %e, failed = ?e.failed_participant(), "alternation failed");
                Err(e)
            }
        }
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}

/// Run the classic alternation: tables of 2 and 4, ten rounds each, to stdout
pub fn run() -> DriverResult<RunReport> {
    Driver::default().run()
}

/// Multiplication-table worker pair for a configuration
pub fn table_workers(config: &DriverConfig) -> (Worker<TableAction>, Worker<TableAction>) {
    (
        Worker::table(Participant::A, config.multiplier_a, config.rounds_a),
        Worker::table(Participant::B, config.multiplier_b, config.rounds_b),
    )
}
