/*!
 * Failure Integration Tests
 *
 * Action errors, panics, stalls and forced shutdown must end the run with an
 * attributed error, never a hang and never a silently shortened sequence.
 */

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use turn_alternator::worker::FailAt;
use turn_alternator::{
    Action, ActionError, DriverConfig, DriverError, Driver, ExecutorKind, MemorySink,
    Participant, TableAction, TurnError, TurnRecord, Worker, WorkerError,
};

fn table(participant: Participant, multiplier: u64) -> Worker<TableAction> {
    Worker::table(participant, multiplier, 10)
}

/// Sleeps inside the turn at one index
struct StallAt {
    inner: TableAction,
    index: u32,
    stall: Duration,
}

impl Action for StallAt {
    fn perform(&mut self, participant: Participant, index: u32) -> Result<TurnRecord, ActionError> {
        if index == self.index {
            thread::sleep(self.stall);
        }
        self.inner.perform(participant, index)
    }
}

#[test]
fn test_worker_a_fails_at_five() {
    let sink = Arc::new(MemorySink::new());
    let driver = Driver::with_sink(DriverConfig::default(), sink.clone());
    let failing_a = Worker::new(
        Participant::A,
        10,
        FailAt::new(TableAction::new(2), 5, "disk on fire"),
    );

    let err = driver.run_workers(failing_a, table(Participant::B, 4)).unwrap_err();

    assert_eq!(err.failed_participant(), Some(Participant::A));
    let DriverError::WorkerFailed { primary, secondary } = err else {
        panic!("expected a worker failure");
    };
    assert_eq!(
        primary,
        WorkerError::Action {
            participant: Participant::A,
            index: 5,
            source: ActionError::new("disk on fire"),
        }
    );
    // B used the turn A handed over, then found A gone
    assert_eq!(
        secondary,
        Some(WorkerError::Turn {
            participant: Participant::B,
            index: 6,
            source: TurnError::CounterpartFailed {
                participant: Participant::B,
                counterpart: Participant::A,
            },
        })
    );

    let order: Vec<(Participant, u32)> = sink
        .records()
        .iter()
        .map(|r| (r.participant, r.index))
        .collect();
    let mut expected: Vec<(Participant, u32)> = (1..=4)
        .flat_map(|i| [(Participant::A, i), (Participant::B, i)])
        .collect();
    expected.push((Participant::B, 5));
    assert_eq!(order, expected);
}

#[test]
fn test_worker_b_fails_first_turn() {
    let sink = Arc::new(MemorySink::new());
    let driver = Driver::with_sink(DriverConfig::default(), sink.clone());
    let failing_b = Worker::new(Participant::B, 10, FailAt::new(TableAction::new(4), 1, "nope"));

    let err = driver.run_workers(table(Participant::A, 2), failing_b).unwrap_err();

    assert_eq!(err.failed_participant(), Some(Participant::B));
    // A's second turn is the one B handed over on failure
    assert_eq!(
        sink.records(),
        vec![
            TurnRecord::new(Participant::A, 2, 1, 2),
            TurnRecord::new(Participant::A, 2, 2, 4),
        ]
    );
}

#[test]
fn test_panicking_action_is_reported() {
    let sink = Arc::new(MemorySink::new());
    let driver = Driver::with_sink(DriverConfig::default(), sink.clone());
    let panicking_a = Worker::new(
        Participant::A,
        10,
        |participant: Participant, index: u32| -> Result<TurnRecord, ActionError> {
            if index == 3 {
                panic!("table overflowed the page");
            }
            Ok(TurnRecord::new(participant, 2, index, 2 * u64::from(index)))
        },
    );

    let err = driver.run_workers(panicking_a, table(Participant::B, 4)).unwrap_err();

    let DriverError::WorkerFailed { primary, .. } = err else {
        panic!("expected a worker failure");
    };
    assert_eq!(
        primary,
        WorkerError::Panicked {
            participant: Participant::A,
            message: "table overflowed the page".to_string(),
        }
    );
    assert_eq!(sink.len(), 5);
}

#[test]
fn test_stalled_counterpart_times_out() {
    let sink = Arc::new(MemorySink::new());
    let config = DriverConfig::default().with_turn_timeout(Duration::from_millis(100));
    let driver = Driver::with_sink(config, sink.clone());
    let stalling_a = Worker::new(
        Participant::A,
        10,
        StallAt {
            inner: TableAction::new(2),
            index: 2,
            stall: Duration::from_millis(500),
        },
    );

    let start = Instant::now();
    let err = driver.run_workers(stalling_a, table(Participant::B, 4)).unwrap_err();

    assert!(start.elapsed() < Duration::from_secs(5));
    let DriverError::WorkerFailed { primary, secondary } = err else {
        panic!("expected a worker failure");
    };
    assert!(matches!(
        primary,
        WorkerError::Turn {
            participant: Participant::B,
            index: 2,
            source: TurnError::TurnTimeout { .. },
        }
    ));
    assert!(secondary.map(|e| e.is_secondary()).unwrap_or(false));
    // A finished the stalled action before noticing B had given up
    assert_eq!(sink.len(), 3);
}

#[test]
fn test_pool_grace_expiry_cancels() {
    let sink = Arc::new(MemorySink::new());
    let config = DriverConfig::default()
        .with_executor(ExecutorKind::Pool)
        .with_shutdown_grace(Duration::from_millis(100));
    let driver = Driver::with_sink(config, sink);
    let stalling_a = Worker::new(
        Participant::A,
        10,
        StallAt {
            inner: TableAction::new(2),
            index: 2,
            stall: Duration::from_millis(400),
        },
    );

    let start = Instant::now();
    let err = driver.run_workers(stalling_a, table(Participant::B, 4)).unwrap_err();

    assert_eq!(
        err,
        DriverError::ShutdownTimeout {
            grace: Duration::from_millis(100)
        }
    );
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[test]
fn test_misassigned_workers_rejected() {
    let sink = Arc::new(MemorySink::new());
    let driver = Driver::with_sink(DriverConfig::default(), sink.clone());

    let err = driver
        .run_workers(table(Participant::A, 2), table(Participant::A, 4))
        .unwrap_err();
    assert_eq!(
        err,
        DriverError::MisassignedWorkers {
            worker_a: Participant::A,
            worker_b: Participant::A,
        }
    );

    let err = driver
        .run_workers(table(Participant::B, 4), table(Participant::A, 2))
        .unwrap_err();
    assert_eq!(err.failed_participant(), None);
    assert!(matches!(err, DriverError::MisassignedWorkers { .. }));
    assert!(sink.is_empty());
}
