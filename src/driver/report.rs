/*!
 * Run Reports
 *
 * Turns the two worker outcomes into either a complete report or a single
 * driver error. A run is never reported as partially successful.
 */

use super::config::ExecutorKind;
use crate::core::errors::{DriverError, DriverResult, WorkerError, WorkerResult};
use crate::core::sync::{Participant, StatsSnapshot};
use crate::worker::WorkerSummary;
use std::any::Any;
use std::time::Duration;

/// Outcome of a fully completed alternation
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: String,
    pub executor: ExecutorKind,
    pub workers: [WorkerSummary; 2],
    pub stats: StatsSnapshot,
    pub elapsed: Duration,
}

impl RunReport {
    /// Actions completed by both workers together
    pub fn total_actions(&self) -> u32 {
        self.workers.iter().map(|w| w.completed).sum()
    }

    pub fn worker(&self, participant: Participant) -> &WorkerSummary {
        &self.workers[participant.slot()]
    }
}

/// Combine both outcomes
///
/// When both workers failed, the primary error is the one that is not just a
/// reaction to the counterpart's failure (ties go to A).
pub(super) fn settle(
    outcome_a: WorkerResult<WorkerSummary>,
    outcome_b: WorkerResult<WorkerSummary>,
) -> DriverResult<[WorkerSummary; 2]> {
    match (outcome_a, outcome_b) {
        (Ok(a), Ok(b)) => Ok([a, b]),
        (Err(primary), Ok(_)) | (Ok(_), Err(primary)) => Err(DriverError::WorkerFailed {
            primary,
            secondary: None,
        }),
        (Err(a), Err(b)) => {
            let (primary, secondary) = if a.is_secondary() && !b.is_secondary() {
                (b, a)
            } else {
                (a, b)
            };
            Err(DriverError::WorkerFailed {
                primary,
                secondary: Some(secondary),
            })
        }
    }
}

/// Convert a panic payload into a worker error
pub(super) fn panicked(participant: Participant, payload: Box<dyn Any + Send>) -> WorkerError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    WorkerError::Panicked {
        participant,
        message,
    }
}
