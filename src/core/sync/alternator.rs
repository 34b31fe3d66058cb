/*!
 * Alternator
 *
 * Two-party turn coordinator built on a monitor: one mutex guards the turn
 * flag, one condvar signals every change to it.
 *
 * # Protocol
 *
 * - `acquire_turn(p)` blocks until the flag names `p`, re-checking the
 *   predicate after every wake (spurious wakeups are expected)
 * - releasing the returned guard flips the flag and wakes the counterpart
 *   under the same lock that confirmed the turn, so a wakeup cannot be lost
 * - a guard dropped without release (error or panic in the action) still
 *   hands the turn over, and marks its owner failed so the counterpart's
 *   next wait fails instead of hanging
 *
 * The mutex is not held while the action runs. Exclusion during the action
 * comes from the flag itself: only the holder may clear `held`.
 */

use super::config::AlternatorConfig;
use super::guard::TurnGuard;
use super::participant::{Departure, Participant};
use super::stats::{AlternationStats, StatsSnapshot};
use crate::core::errors::{TurnError, TurnResult};
use parking_lot::{Condvar, Mutex};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Shared turn state, only touched under the alternator's mutex
#[derive(Debug)]
struct TurnState {
    turn: Participant,
    held: bool,
    departed: [Option<Departure>; 2],
    cancelled: bool,
}

/// Outcome of one predicate check
enum Poll {
    Granted,
    Refused(TurnError),
    Pending,
}

impl TurnState {
    fn new(first: Participant) -> Self {
        Self {
            turn: first,
            held: false,
            departed: [None, None],
            cancelled: false,
        }
    }

    fn poll(&mut self, participant: Participant) -> Poll {
        if self.cancelled {
            return Poll::Refused(TurnError::Cancelled { participant });
        }
        if self.held {
            return Poll::Pending;
        }
        if self.turn == participant {
            return Poll::Granted;
        }

        let counterpart = participant.other();
        match self.departed[counterpart.slot()] {
            Some(Departure::Failed) => Poll::Refused(TurnError::CounterpartFailed {
                participant,
                counterpart,
            }),
            // Nobody left to alternate with
            Some(Departure::Finished) => {
                self.turn = participant;
                Poll::Granted
            }
            None => Poll::Pending,
        }
    }
}

/// Strict alternation between participants A and B
///
/// Created by the driver before any worker starts and shared with both
/// workers through an `Arc`.
///
/// # Examples
///
/// ```
/// use turn_alternator::core::sync::{Alternator, Participant};
///
/// let alternator = Alternator::with_defaults();
/// let first = alternator.run_turn(Participant::A, || 2 * 1).unwrap();
/// assert_eq!(first, 2);
/// assert_eq!(alternator.current_turn(), Participant::B);
/// ```
pub struct Alternator {
    state: Mutex<TurnState>,
    turn_changed: Condvar,
    config: AlternatorConfig,
    stats: AlternationStats,
}

impl Alternator {
    /// Create an alternator with the given configuration
    pub fn new(config: AlternatorConfig) -> Self {
        Self {
            state: Mutex::new(TurnState::new(config.first)),
            turn_changed: Condvar::new(),
            config,
            stats: AlternationStats::default(),
        }
    }

    /// A moves first, unbounded waits
    pub fn with_defaults() -> Self {
        Self::new(AlternatorConfig::baseline())
    }

    pub fn config(&self) -> &AlternatorConfig {
        &self.config
    }

    /// Block until it is `participant`'s turn
    ///
    /// Never returns `Ok` while the counterpart holds the turn. Fails with
    /// `Cancelled` after `cancel()`, `CounterpartFailed` once the counterpart
    /// abandoned the alternation, and `TurnTimeout` when a bounded wait
    /// expires.
    pub fn acquire_turn(&self, participant: Participant) -> TurnResult<TurnGuard<'_>> {
        let start = Instant::now();
        let deadline = self.config.turn_timeout.deadline(start);
        let mut state = self.state.lock();
        let mut woken = false;
        let mut expired = false;

        loop {
            match state.poll(participant) {
                Poll::Granted => {
                    if woken {
                        self.stats.record_wakeup(false);
                    }
                    break;
                }
                Poll::Refused(err) => {
                    if matches!(err, TurnError::Cancelled { .. }) {
                        self.stats.record_cancellation();
                    }
                    debug!(participant = %participant, error = %err, "turn refused");
                    return Err(err);
                }
                Poll::Pending => {
                    if woken {
                        self.stats.record_wakeup(true);
                    }
                }
            }

            if expired {
                self.stats.record_timeout();
                let waited = start.elapsed();
                warn!(participant = %participant, waited_ms = waited.as_millis() as u64, "turn wait timed out");
                return Err(TurnError::TurnTimeout {
                    participant,
                    waited,
                });
            }

            if !woken {
                self.stats.record_wait();
                trace!(participant = %participant, "waiting for turn");
            }

            match deadline {
                None => self.turn_changed.wait(&mut state),
                Some(deadline) => {
                    // Poll once more after expiry before failing
                    expired = self.turn_changed.wait_until(&mut state, deadline).timed_out();
                }
            }
            woken = true;
        }

        state.held = true;
        self.stats.enter_turn();
        drop(state);

        trace!(participant = %participant, "turn acquired");
        Ok(TurnGuard::new(self, participant))
    }

    /// Acquire the turn, run `action`, hand the turn to the counterpart
    ///
    /// A panic inside `action` abandons the turn (see `TurnGuard`).
    pub fn run_turn<T, F>(&self, participant: Participant, action: F) -> TurnResult<T>
    where
        F: FnOnce() -> T,
    {
        let guard = self.acquire_turn(participant)?;
        let output = action();
        guard.release_turn();
        Ok(output)
    }

    /// Called by `TurnGuard` to flip the flag and wake the counterpart
    pub(super) fn finish_turn(&self, participant: Participant, abandoned: bool) {
        let mut state = self.state.lock();
        debug_assert!(state.held && state.turn == participant);

        self.stats.exit_turn(abandoned);
        state.held = false;
        state.turn = participant.other();

        if abandoned {
            state.departed[participant.slot()] = Some(Departure::Failed);
            self.turn_changed.notify_all();
        } else {
            self.turn_changed.notify_one();
        }
        trace!(participant = %participant, abandoned, "turn released");
    }

    /// Record that `participant` will not ask for another turn
    ///
    /// A `Failed` departure is sticky; a later `Finished` does not clear it.
    pub fn depart(&self, participant: Participant, departure: Departure) {
        let mut state = self.state.lock();
        let slot = &mut state.departed[participant.slot()];
        if *slot != Some(Departure::Failed) {
            *slot = Some(departure);
        }
        self.turn_changed.notify_all();
        debug!(participant = %participant, departure = ?departure, "participant departed");
    }

    /// Wake every waiter with `TurnError::Cancelled`
    ///
    /// A worker currently holding the turn finishes its action; its next
    /// acquire fails.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if !state.cancelled {
            state.cancelled = true;
            warn!("alternation cancelled");
        }
        self.turn_changed.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock().cancelled
    }

    /// Participant whose turn it currently is
    pub fn current_turn(&self) -> Participant {
        self.state.lock().turn
    }

    /// How `participant` left, if it has
    pub fn departure(&self, participant: Participant) -> Option<Departure> {
        self.state.lock().departed[participant.slot()]
    }

    /// Snapshot of the alternation counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }
}

impl Default for Alternator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for Alternator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Alternator")
            .field("state", &*self.state.lock())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_first_turn_is_a() {
        let alternator = Alternator::with_defaults();
        assert_eq!(alternator.current_turn(), Participant::A);

        let guard = alternator.acquire_turn(Participant::A).unwrap();
        assert_eq!(guard.participant(), Participant::A);
        guard.release_turn();
        assert_eq!(alternator.current_turn(), Participant::B);
    }

    #[test]
    fn test_b_blocks_until_a_releases() {
        let alternator = Arc::new(Alternator::with_defaults());
        let alt_clone = alternator.clone();

        let handle = thread::spawn(move || {
            let guard = alt_clone.acquire_turn(Participant::B).unwrap();
            guard.release_turn();
        });

        // Give B time to block
        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished());
        assert_eq!(alternator.stats().turns_granted, 0);

        alternator.run_turn(Participant::A, || ()).unwrap();
        handle.join().unwrap();

        let stats = alternator.stats();
        assert_eq!(stats.turns_granted, 2);
        assert!(stats.waits >= 1);
        assert_eq!(alternator.current_turn(), Participant::A);
    }

    #[test]
    fn test_turn_timeout() {
        let alternator =
            Alternator::new(AlternatorConfig::baseline().with_turn_timeout(Duration::from_millis(50)));
        let start = Instant::now();

        let result = alternator.acquire_turn(Participant::B);

        assert!(matches!(
            result,
            Err(TurnError::TurnTimeout { participant: Participant::B, .. })
        ));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(alternator.stats().timeouts, 1);
    }

    #[test]
    fn test_huge_turn_timeout_waits_unbounded() {
        let alternator =
            Alternator::new(AlternatorConfig::baseline().with_turn_timeout(Duration::MAX));

        assert_eq!(alternator.run_turn(Participant::A, || 1).unwrap(), 1);

        let alternator = Arc::new(alternator);
        let alt_clone = alternator.clone();
        let handle = thread::spawn(move || alt_clone.run_turn(Participant::A, || 2));

        thread::sleep(Duration::from_millis(20));
        assert!(!handle.is_finished());
        alternator.run_turn(Participant::B, || ()).unwrap();

        assert_eq!(handle.join().unwrap(), Ok(2));
        assert_eq!(alternator.stats().timeouts, 0);
    }

    #[test]
    fn test_cancel_wakes_waiter() {
        let alternator = Arc::new(Alternator::with_defaults());
        let alt_clone = alternator.clone();

        let handle = thread::spawn(move || alt_clone.acquire_turn(Participant::B).map(|_| ()));

        thread::sleep(Duration::from_millis(50));
        alternator.cancel();

        let result = handle.join().unwrap();
        assert_eq!(
            result,
            Err(TurnError::Cancelled {
                participant: Participant::B
            })
        );
        assert!(alternator.is_cancelled());
    }

    #[test]
    fn test_abandoned_turn_passes_over_once() {
        let alternator = Alternator::with_defaults();

        let guard = alternator.acquire_turn(Participant::A).unwrap();
        guard.abandon();

        assert_eq!(alternator.departure(Participant::A), Some(Departure::Failed));
        // B still gets the turn A handed over
        alternator.run_turn(Participant::B, || ()).unwrap();
        // but cannot wait for A again
        let err = alternator.acquire_turn(Participant::B).unwrap_err();
        assert_eq!(
            err,
            TurnError::CounterpartFailed {
                participant: Participant::B,
                counterpart: Participant::A,
            }
        );
        assert_eq!(alternator.stats().abandoned_turns, 1);
    }

    #[test]
    fn test_finished_counterpart_yields_turns() {
        let alternator = Alternator::with_defaults();

        alternator.run_turn(Participant::A, || ()).unwrap();
        alternator.depart(Participant::A, Departure::Finished);

        for _ in 0..3 {
            alternator.run_turn(Participant::B, || ()).unwrap();
        }
        assert_eq!(alternator.stats().turns_granted, 4);
    }

    #[test]
    fn test_failed_departure_is_sticky() {
        let alternator = Alternator::with_defaults();
        alternator.depart(Participant::B, Departure::Failed);
        alternator.depart(Participant::B, Departure::Finished);
        assert_eq!(alternator.departure(Participant::B), Some(Departure::Failed));
    }
}
