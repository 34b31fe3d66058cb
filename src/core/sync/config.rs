/*!
 * Alternator Configuration
 *
 * Who moves first and how long a worker may wait for its turn
 */

use super::participant::Participant;
use crate::core::timeout::TimeoutPolicy;
use std::time::Duration;

/// Alternator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlternatorConfig {
    /// Participant holding the first turn
    pub first: Participant,
    /// Bound on each turn wait (`TimeoutPolicy::None` waits forever)
    pub turn_timeout: TimeoutPolicy,
}

impl Default for AlternatorConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

impl AlternatorConfig {
    /// A moves first, waits are unbounded
    pub const fn baseline() -> Self {
        Self {
            first: Participant::A,
            turn_timeout: TimeoutPolicy::None,
        }
    }

    /// Override the turn timeout
    pub const fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = TimeoutPolicy::Turn(timeout);
        self
    }
}
