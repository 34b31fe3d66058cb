/*!
 * Alternation Statistics
 *
 * Relaxed atomic counters updated on the turn hot path, read as snapshots.
 */

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Live counters owned by an alternator
#[derive(Debug, Default)]
pub(crate) struct AlternationStats {
    turns_granted: AtomicU64,
    waits: AtomicU64,
    wakeups: AtomicU64,
    spurious_wakeups: AtomicU64,
    timeouts: AtomicU64,
    cancellations: AtomicU64,
    abandoned_turns: AtomicU64,
    holders: AtomicUsize,
    peak_holders: AtomicUsize,
}

impl AlternationStats {
    #[inline]
    pub(crate) fn record_wait(&self) {
        self.waits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_wakeup(&self, spurious: bool) {
        self.wakeups.fetch_add(1, Ordering::Relaxed);
        if spurious {
            self.spurious_wakeups.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[inline]
    pub(crate) fn record_timeout(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_cancellation(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    /// A turn was granted; tracks how many holders exist at once
    #[inline]
    pub(crate) fn enter_turn(&self) {
        self.turns_granted.fetch_add(1, Ordering::Relaxed);
        let now = self.holders.fetch_add(1, Ordering::AcqRel) + 1;
        self.peak_holders.fetch_max(now, Ordering::AcqRel);
    }

    #[inline]
    pub(crate) fn exit_turn(&self, abandoned: bool) {
        self.holders.fetch_sub(1, Ordering::AcqRel);
        if abandoned {
            self.abandoned_turns.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            turns_granted: self.turns_granted.load(Ordering::Relaxed),
            waits: self.waits.load(Ordering::Relaxed),
            wakeups: self.wakeups.load(Ordering::Relaxed),
            spurious_wakeups: self.spurious_wakeups.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            abandoned_turns: self.abandoned_turns.load(Ordering::Relaxed),
            holders: self.holders.load(Ordering::Acquire),
            peak_holders: self.peak_holders.load(Ordering::Acquire),
        }
    }
}

/// Point-in-time copy of the alternation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub turns_granted: u64,
    /// Times a worker found it was not its turn and blocked
    pub waits: u64,
    pub wakeups: u64,
    /// Wakeups after which the predicate still did not hold
    pub spurious_wakeups: u64,
    pub timeouts: u64,
    pub cancellations: u64,
    /// Turns dropped by a failing or panicking worker
    pub abandoned_turns: u64,
    /// Workers currently holding a turn
    pub holders: usize,
    /// Most workers ever observed holding a turn at once
    pub peak_holders: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_tracks_overlap() {
        let stats = AlternationStats::default();
        stats.enter_turn();
        stats.exit_turn(false);
        stats.enter_turn();
        stats.enter_turn();
        stats.exit_turn(false);
        stats.exit_turn(true);

        let snap = stats.snapshot();
        assert_eq!(snap.turns_granted, 3);
        assert_eq!(snap.peak_holders, 2);
        assert_eq!(snap.holders, 0);
        assert_eq!(snap.abandoned_turns, 1);
    }
}
