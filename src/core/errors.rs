/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::sync::Participant;
use miette::Diagnostic;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Result type for turn operations
pub type TurnResult<T> = Result<T, TurnError>;

/// Result type for worker runs
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Result type for driver runs
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors raised while waiting for or holding a turn
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum TurnError {
    #[error("Worker {participant} waited {waited:?} for its turn")]
    #[diagnostic(
        code(turn::timeout),
        help("The counterpart never released the turn. It is stalled or deadlocked.")
    )]
    TurnTimeout {
        participant: Participant,
        #[serde(serialize_with = "serialize_duration_ms")]
        waited: Duration,
    },

    #[error("Wait for worker {participant}'s turn was cancelled")]
    #[diagnostic(
        code(turn::cancelled),
        help("The alternation was shut down while this worker was waiting.")
    )]
    Cancelled { participant: Participant },

    #[error("Worker {counterpart} failed; worker {participant} cannot take another turn")]
    #[diagnostic(
        code(turn::counterpart_failed),
        help("See the counterpart's error for the root cause.")
    )]
    CounterpartFailed {
        participant: Participant,
        counterpart: Participant,
    },
}

/// Failure of a single unit of work
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(action::failed))]
pub struct ActionError {
    pub message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Worker run errors
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum WorkerError {
    #[error("Worker {participant} failed at index {index}: {source}")]
    #[diagnostic(
        code(worker::action_failed),
        help("The turn was released to the counterpart before the worker stopped.")
    )]
    Action {
        participant: Participant,
        index: u32,
        #[source]
        source: ActionError,
    },

    #[error("Worker {participant} stopped before index {index}: {source}")]
    #[diagnostic(code(worker::turn_failed))]
    Turn {
        participant: Participant,
        index: u32,
        #[source]
        source: TurnError,
    },

    #[error("Worker {participant} panicked: {message}")]
    #[diagnostic(
        code(worker::panicked),
        help("A panic while holding the turn marks the worker as failed.")
    )]
    Panicked {
        participant: Participant,
        message: String,
    },
}

impl WorkerError {
    /// Worker the error is attributed to
    pub fn participant(&self) -> Participant {
        match self {
            Self::Action { participant, .. }
            | Self::Turn { participant, .. }
            | Self::Panicked { participant, .. } => *participant,
        }
    }

    /// True when this worker only stopped because its counterpart failed
    pub fn is_secondary(&self) -> bool {
        matches!(
            self,
            Self::Turn {
                source: TurnError::CounterpartFailed { .. },
                ..
            }
        )
    }
}

/// Driver run errors
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum DriverError {
    #[error("Alternation failed: {primary}")]
    #[diagnostic(
        code(driver::worker_failed),
        help("The run is incomplete. No partial success is reported.")
    )]
    WorkerFailed {
        #[source]
        primary: WorkerError,
        secondary: Option<WorkerError>,
    },

    #[error("Workers did not terminate within {grace:?}; alternation was cancelled")]
    #[diagnostic(
        code(driver::shutdown_timeout),
        help("Raise the shutdown grace period or enable a turn timeout.")
    )]
    ShutdownTimeout {
        #[serde(serialize_with = "serialize_duration_ms")]
        grace: Duration,
    },

    #[error("Workers assigned to {worker_a} and {worker_b}; expected A and B")]
    #[diagnostic(
        code(driver::misassigned_workers),
        help("Pass participant A's worker first and participant B's worker second.")
    )]
    MisassignedWorkers {
        worker_a: Participant,
        worker_b: Participant,
    },

    #[error("Executor failure: {0}")]
    #[diagnostic(code(driver::executor))]
    Executor(String),
}

impl DriverError {
    /// Worker the failure is attributed to, if any
    pub fn failed_participant(&self) -> Option<Participant> {
        match self {
            Self::WorkerFailed { primary, .. } => Some(primary.participant()),
            _ => None,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    #[diagnostic(code(config::invalid_value))]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

fn serialize_duration_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}
