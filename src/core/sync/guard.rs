/*!
 * Turn Guard
 *
 * RAII proof that a participant holds the turn. Releasing hands the turn to
 * the counterpart; dropping without releasing abandons it.
 */

use super::alternator::Alternator;
use super::participant::Participant;
use std::time::{Duration, Instant};
use tracing::warn;

/// Held turn of one participant
///
/// # Release discipline
///
/// - `release_turn()`: normal completion, wakes the counterpart
/// - `abandon()` or drop: the turn still moves to the counterpart, and the
///   owner is marked failed so the counterpart never waits on it again
#[must_use = "dropping a TurnGuard abandons the turn"]
pub struct TurnGuard<'a> {
    alternator: &'a Alternator,
    participant: Participant,
    acquired_at: Instant,
    released: bool,
}

impl<'a> TurnGuard<'a> {
    pub(super) fn new(alternator: &'a Alternator, participant: Participant) -> Self {
        Self {
            alternator,
            participant,
            acquired_at: Instant::now(),
            released: false,
        }
    }

    /// Participant holding this turn
    #[inline]
    pub fn participant(&self) -> Participant {
        self.participant
    }

    /// Time since the turn was granted
    #[inline]
    pub fn held_for(&self) -> Duration {
        self.acquired_at.elapsed()
    }

    /// Hand the turn to the counterpart
    pub fn release_turn(mut self) {
        self.released = true;
        self.alternator.finish_turn(self.participant, false);
    }

    /// Give up the turn after a failure
    pub fn abandon(mut self) {
        self.released = true;
        self.alternator.finish_turn(self.participant, true);
    }
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        warn!(
            participant = %self.participant,
            panicking = std::thread::panicking(),
            "turn guard dropped without release"
        );
        self.alternator.finish_turn(self.participant, true);
    }
}

impl std::fmt::Debug for TurnGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnGuard")
            .field("participant", &self.participant)
            .field("held_for", &self.held_for())
            .finish()
    }
}
