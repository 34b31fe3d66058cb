/*!
 * Worker
 *
 * Runs a bounded sequence of actions, each gated by the alternator.
 */

use super::action::{Action, TableAction};
use super::record::RecordSink;
use crate::core::errors::{WorkerError, WorkerResult};
use crate::core::sync::{Alternator, Departure, Participant};
use std::time::{Duration, Instant};
use tracing::{debug, debug_span, warn};

/// What a worker accomplished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    pub participant: Participant,
    /// Actions that completed and were recorded
    pub completed: u32,
    pub elapsed: Duration,
}

/// One participant's sequence of `rounds` actions
#[derive(Debug, Clone)]
pub struct Worker<A> {
    participant: Participant,
    rounds: u32,
    action: A,
}

impl Worker<TableAction> {
    /// Multiplication table worker: `multiplier x 1..=rounds`
    pub fn table(participant: Participant, multiplier: u64, rounds: u32) -> Self {
        Self::new(participant, rounds, TableAction::new(multiplier))
    }
}

impl<A: Action> Worker<A> {
    pub fn new(participant: Participant, rounds: u32, action: A) -> Self {
        Self {
            participant,
            rounds,
            action,
        }
    }

    pub fn participant(&self) -> Participant {
        self.participant
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Run every action in order, one per turn
    ///
    /// For each index: acquire the turn, perform the action, record its
    /// output, release the turn. A failed action abandons the turn before
    /// the error is returned. On any exit the worker departs the
    /// alternation so the counterpart is never left waiting on it.
    pub fn run(mut self, alternator: &Alternator, sink: &dyn RecordSink) -> WorkerResult<WorkerSummary> {
        let span = debug_span!("worker", participant = %self.participant, rounds = self.rounds);
        let _entered = span.enter();
        let start = Instant::now();

        let result = self.run_actions(alternator, sink);

        let departure = match &result {
            Ok(_) => Departure::Finished,
            Err(_) => Departure::Failed,
        };
        alternator.depart(self.participant, departure);

        match result {
            Ok(completed) => {
                debug!(completed, "worker finished");
                Ok(WorkerSummary {
                    participant: self.participant,
                    completed,
                    elapsed: start.elapsed(),
                })
            }
            Err(e) => {
                warn!(error = %e, "worker stopped");
                Err(e)
            }
        }
    }

    fn run_actions(&mut self, alternator: &Alternator, sink: &dyn RecordSink) -> WorkerResult<u32> {
        let participant = self.participant;

        for index in 1..=self.rounds {
            let guard = alternator
                .acquire_turn(participant)
                .map_err(|source| WorkerError::Turn {
                    participant,
                    index,
                    source,
                })?;

            match self.action.perform(participant, index) {
                Ok(record) => {
                    sink.record(&record);
                    guard.release_turn();
                }
                Err(source) => {
                    guard.abandon();
                    return Err(WorkerError::Action {
                        participant,
                        index,
                        source,
                    });
                }
            }
        }

        Ok(self.rounds)
    }
}
