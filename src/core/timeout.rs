/*!
 * Timeout Policies
 *
 * Bounded-wait policies for turn acquisition and worker shutdown.
 *
 * ## Timeout Classes
 *
 * - **Turn**: how long a worker waits for its counterpart to hand over
 * - **Shutdown**: how long the driver waits for workers to terminate
 *
 * `None` is the baseline: wait forever, a stalled counterpart hangs the run.
 */

use std::time::{Duration, Instant};

/// Timeout policy for blocking operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// No timeout (infinite wait)
    #[default]
    None,

    /// Turn acquisition timeout
    Turn(Duration),

    /// Worker termination timeout
    Shutdown(Duration),
}

impl TimeoutPolicy {
    /// Default turn timeout
    pub const fn default_turn() -> Self {
        Self::Turn(crate::core::limits::DEFAULT_TURN_TIMEOUT)
    }

    /// Default shutdown grace period
    pub const fn default_shutdown() -> Self {
        Self::Shutdown(crate::core::limits::DEFAULT_SHUTDOWN_GRACE)
    }

    /// Get the duration for this policy
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::Turn(d) | Self::Shutdown(d) => Some(*d),
        }
    }

    /// Absolute deadline when measured from `start`
    ///
    /// A duration too large to represent as an `Instant` is unbounded.
    pub fn deadline(&self, start: Instant) -> Option<Instant> {
        self.duration().and_then(|d| start.checked_add(d))
    }

    /// Get timeout category as string
    pub fn category(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Turn(_) => "turn",
            Self::Shutdown(_) => "shutdown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_no_deadline() {
        let policy = TimeoutPolicy::None;
        assert_eq!(policy.duration(), None);
        assert_eq!(policy.deadline(Instant::now()), None);
        assert_eq!(policy.category(), "none");
    }

    #[test]
    fn test_deadline_from_start() {
        let policy = TimeoutPolicy::Turn(Duration::from_millis(10));
        let start = Instant::now();
        assert_eq!(policy.deadline(start), Some(start + Duration::from_millis(10)));
        assert_eq!(policy.category(), "turn");
    }

    #[test]
    fn test_unrepresentable_deadline_is_unbounded() {
        let policy = TimeoutPolicy::Turn(Duration::MAX);
        assert_eq!(policy.duration(), Some(Duration::MAX));
        assert_eq!(policy.deadline(Instant::now()), None);
    }
}
